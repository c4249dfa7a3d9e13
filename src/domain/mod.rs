// Domain layer: core models and ports (interfaces). No image or CLI dependencies here.

pub mod model;
pub mod ports;
