//! Plain-text rendering of a finished consultation, in Portuguese.

use crate::core::consultation::{ConsultationReport, QuoteOutcome, SkipReason};
use crate::domain::dimensions::round_kg;
use crate::domain::model::PackagingRecommendation;
use crate::domain::offers::format_days;
use std::fmt::Write;

pub const DISCLAIMER: &str = "Protótipo educacional. Valores e prazos são estimativas; \
     confirme as regras da transportadora antes de postar.";

pub fn render(report: &ConsultationReport) -> String {
    let mut out = String::new();
    let pkg = &report.package;

    section(&mut out, "Resumo do pacote");
    let _ = writeln!(out, "Categoria: {}", pkg.category);
    if !pkg.description.trim().is_empty() {
        let _ = writeln!(out, "Produto: {}", pkg.description.trim());
    }
    if let Some(fragility) = pkg.fragility {
        let _ = writeln!(out, "Fragilidade: {}", fragility.label());
    }
    let estimated = if report.suggestion.dimensions_estimated {
        " (estimadas)"
    } else {
        ""
    };
    let _ = writeln!(out, "Dimensões: {} cm{}", pkg.dimensions, estimated);
    let _ = writeln!(out, "Quantidade por envio: {}", pkg.quantity);
    let _ = writeln!(out, "Origem: {}", report.origin);

    section(&mut out, "Sugestão inicial");
    let _ = writeln!(
        out,
        "{} · caixa de {} cm",
        report.suggestion.packaging_type, report.suggestion.box_dimensions
    );

    render_recommendation(&mut out, &report.recommendation);
    render_quote(&mut out, &report.quote);

    section(&mut out, "Peso");
    let _ = writeln!(
        out,
        "Peso real: {} kg · peso cubado: {} kg (divisor {}).",
        round_kg(pkg.weight_kg),
        report.cubed_weight_kg,
        report.volumetric_divisor
    );
    let _ = writeln!(out, "Transportadoras cobram pelo maior dos dois.");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", DISCLAIMER);
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "== {} ==", title);
}

fn render_recommendation(out: &mut String, rec: &PackagingRecommendation) {
    section(out, "Embalagem recomendada");
    let rec_box = &rec.recommended_box;
    let _ = writeln!(out, "{} ({} cm)", rec_box.description, rec_box.dimensions_cm);
    if !rec_box.rationale.is_empty() {
        let _ = writeln!(out, "Motivo: {}", rec_box.rationale);
    }

    if !rec.internal_protection.is_empty() {
        section(out, "Proteção interna");
        for item in &rec.internal_protection {
            let _ = write!(out, "- {}", item.kind);
            if !item.suggested_quantity.is_empty() {
                let _ = write!(out, " ({})", item.suggested_quantity);
            }
            if !item.note.is_empty() {
                let _ = write!(out, ": {}", item.note);
            }
            let _ = writeln!(out);
        }
    }

    if !rec.seals_and_reinforcements.is_empty() {
        section(out, "Lacres e reforços");
        for item in &rec.seals_and_reinforcements {
            if item.note.is_empty() {
                let _ = writeln!(out, "- {}", item.kind);
            } else {
                let _ = writeln!(out, "- {}: {}", item.kind, item.note);
            }
        }
    }

    let cost = &rec.cost_estimate;
    if cost.total_brl.is_some() || !cost.notes.is_empty() {
        section(out, "Custo estimado da embalagem");
        if let Some(total) = cost.total_brl {
            let _ = writeln!(out, "R$ {:.2}", total);
        }
        if !cost.notes.is_empty() {
            let _ = writeln!(out, "{}", cost.notes);
        }
    }

    if !rec.risks_and_mitigations.is_empty() {
        section(out, "Riscos e mitigação");
        for pair in &rec.risks_and_mitigations {
            let _ = writeln!(out, "- {} → {}", pair.risk, pair.mitigation);
        }
    }

    if !rec.cubage_impact.comment.is_empty() {
        section(out, "Impacto na cubagem");
        let _ = writeln!(out, "{}", rec.cubage_impact.comment);
    }

    if !rec.best_practices.is_empty() {
        section(out, "Boas práticas");
        for tip in &rec.best_practices {
            let _ = writeln!(out, "- {}", tip);
        }
    }

    if !rec.short_summary.is_empty() {
        section(out, "Resumo");
        let _ = writeln!(out, "{}", rec.short_summary);
    }
}

fn render_quote(out: &mut String, quote: &QuoteOutcome) {
    section(out, "Frete");
    match quote {
        QuoteOutcome::Skipped {
            reason: SkipReason::NoDestination,
        } => {
            let _ = writeln!(out, "Informe o CEP de destino (--destination) para cotar o frete.");
        }
        QuoteOutcome::Skipped {
            reason: SkipReason::NoShippingCredential,
        } => {
            let _ = writeln!(
                out,
                "Configure SUPERFRETE_TOKEN para cotar o frete com a caixa recomendada."
            );
        }
        QuoteOutcome::Failed { error } => {
            let _ = writeln!(out, "Não foi possível cotar: {}", error.user_friendly_message());
        }
        QuoteOutcome::Quoted {
            request,
            offers,
            selection,
        } => {
            let _ = writeln!(
                out,
                "{} → {} · caixa {} cm · {} kg",
                request.origin, request.destination, request.dimensions, request.weight_kg
            );
            for offer in offers {
                let _ = writeln!(
                    out,
                    "- {} {}: R$ {:.2} · {}",
                    offer.carrier,
                    offer.service,
                    offer.price,
                    format_days(offer.delivery_days)
                );
            }
            let best = &selection.best_price;
            let _ = writeln!(
                out,
                "Melhor preço: {} {} · R$ {:.2}",
                best.carrier, best.service, best.price
            );
            let fastest = &selection.best_time;
            let _ = writeln!(
                out,
                "Menor prazo: {} {} · {}",
                fastest.carrier,
                fastest.service,
                format_days(fastest.delivery_days)
            );
        }
    }
}
