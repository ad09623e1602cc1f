// Domain layer: entities, identity keys and the traits the registries are generic over.

pub mod model;
pub mod ports;
