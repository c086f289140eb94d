use clap::Parser;
use pack_advisor::config::redact;
use pack_advisor::utils::error::{AdvisorError, ErrorSeverity};
use pack_advisor::utils::{logger, validation::Validate};
use pack_advisor::{report, AppConfig, CliArgs, Consultation, OpenAiClient, SuperFreteClient};

fn exit_with(e: &AdvisorError) -> ! {
    tracing::error!(
        "❌ Consultation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Sugestão: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_logger(logger::LogFormat::from_json_flag(args.log_json), args.verbose);

    tracing::info!("Starting pack-advisor CLI");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    match &config.advisor.api_key {
        Some(key) => tracing::debug!("🔑 OpenAI key {}", redact(key)),
        None => tracing::warn!("⚠️ OPENAI_API_KEY is not set"),
    }
    match &config.shipping.token {
        Some(token) => tracing::debug!(
            "🔑 SuperFrete token {} ({})",
            redact(token),
            config.shipping.endpoint()
        ),
        None => tracing::info!("ℹ️ SUPERFRETE_TOKEN is not set; quotes disabled"),
    }

    let chat = match OpenAiClient::new(&config.advisor) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };
    let quotes = match SuperFreteClient::new(&config.shipping) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };
    let consultation = Consultation::new(chat, quotes, &config);

    match consultation.run(&args.to_form()).await {
        Ok(result) => {
            tracing::info!("✅ Consultation completed");
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render(&result));
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
