// Domain layer: participants, history, assignments and the ports the engine and reporter depend on.

pub mod model;
pub mod ports;
