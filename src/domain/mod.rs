// Domain layer: core models and ports (interfaces) to the rendering and persistence collaborators.

pub mod model;
pub mod ports;
