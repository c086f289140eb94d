// Adapters layer: concrete clients for the recommendation and shipping-rate services.

pub mod normalize;
pub mod openai;
pub mod superfrete;

pub use openai::OpenAiClient;
pub use superfrete::SuperFreteClient;
