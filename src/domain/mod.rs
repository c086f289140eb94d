// Domain layer: models, pure packaging rules and the ports the core talks to.

pub mod dimensions;
pub mod heuristics;
pub mod model;
pub mod offers;
pub mod ports;
pub mod postal;
