use crate::domain::model::{Car, Circuit, Country, Driver, EntityKind, Mechanic, Team};

/// A registry entry with a single identity key.
pub trait Identified {
    const KIND: EntityKind;

    fn identity(&self) -> String;
}

impl Identified for Country {
    const KIND: EntityKind = EntityKind::Country;

    fn identity(&self) -> String {
        self.code.clone()
    }
}

impl Identified for Circuit {
    const KIND: EntityKind = EntityKind::Circuit;

    fn identity(&self) -> String {
        self.id().to_string()
    }
}

impl Identified for Driver {
    const KIND: EntityKind = EntityKind::Driver;

    fn identity(&self) -> String {
        self.race_number.to_string()
    }
}

impl Identified for Team {
    const KIND: EntityKind = EntityKind::Team;

    fn identity(&self) -> String {
        self.name.clone()
    }
}

impl Identified for Car {
    const KIND: EntityKind = EntityKind::Car;

    fn identity(&self) -> String {
        self.chassis_number.clone()
    }
}

impl Identified for Mechanic {
    const KIND: EntityKind = EntityKind::Mechanic;

    fn identity(&self) -> String {
        self.dni.clone()
    }
}
