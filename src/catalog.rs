// catalog.rs — Built-in engines seeded into every new database.
//
// These are approved catalog entries with no author. User contributions go
// through `db::submit_engine` and start out `Pending`.

use crate::models::{CoolingType, StrokeType};

pub struct SeedEngine {
    pub id:          &'static str,
    pub name:        &'static str,
    pub index:       &'static str,
    pub brand:       &'static str,
    pub volume:      u32,
    pub stroke:      StrokeType,
    pub cooling:     CoolingType,
    pub power:       f64,
    pub torque:      f64,
    pub valves:      u8,
    pub timing_type: &'static str,
    pub fuel_system: &'static str,
    pub description: &'static str,
}

pub const BUILTIN_ENGINES: &[SeedEngine] = &[
    SeedEngine {
        id: "yx140", name: "YX 140", index: "YX140", brand: "YX",
        volume: 140, stroke: StrokeType::FourStroke, cooling: CoolingType::Air,
        power: 11.0, torque: 10.0, valves: 2,
        timing_type: "SOHC", fuel_system: "Carburetor",
        description: "Horizontal pit bike engine, 4-speed, kick start.",
    },
    SeedEngine {
        id: "yx150", name: "YX 150", index: "YX150", brand: "YX",
        volume: 150, stroke: StrokeType::FourStroke, cooling: CoolingType::Oil,
        power: 13.0, torque: 11.5, valves: 2,
        timing_type: "SOHC", fuel_system: "Carburetor",
        description: "Oil-cooled horizontal engine with electric start.",
    },
    SeedEngine {
        id: "zs155", name: "Zongshen 155", index: "ZS1P60YMJ", brand: "Zongshen",
        volume: 155, stroke: StrokeType::FourStroke, cooling: CoolingType::Oil,
        power: 14.0, torque: 12.0, valves: 2,
        timing_type: "SOHC", fuel_system: "Carburetor",
        description: "Oil-cooled pit bike engine, 4-speed.",
    },
    SeedEngine {
        id: "zs190", name: "Zongshen 190", index: "ZS1P62YML-2", brand: "Zongshen",
        volume: 190, stroke: StrokeType::FourStroke, cooling: CoolingType::Oil,
        power: 18.0, torque: 15.0, valves: 4,
        timing_type: "SOHC", fuel_system: "Carburetor",
        description: "Four-valve head, 5-speed gearbox.",
    },
    SeedEngine {
        id: "lifan150", name: "Lifan 150", index: "1P56FMJ", brand: "Lifan",
        volume: 150, stroke: StrokeType::FourStroke, cooling: CoolingType::Air,
        power: 12.5, torque: 11.0, valves: 2,
        timing_type: "SOHC", fuel_system: "Carburetor",
        description: "Horizontal air-cooled engine, 4-speed.",
    },
    SeedEngine {
        id: "cb250", name: "CB250", index: "172FMM", brand: "CB/CBB Series",
        volume: 223, stroke: StrokeType::FourStroke, cooling: CoolingType::Air,
        power: 16.0, torque: 17.0, valves: 2,
        timing_type: "OHV", fuel_system: "Carburetor",
        description: "Vertical pushrod engine, 5-speed, common in budget enduro bikes.",
    },
    SeedEngine {
        id: "nc250", name: "NC250", index: "ZS177MM", brand: "NC Series",
        volume: 250, stroke: StrokeType::FourStroke, cooling: CoolingType::Liquid,
        power: 27.0, torque: 22.0, valves: 4,
        timing_type: "DOHC", fuel_system: "Carburetor",
        description: "Liquid-cooled four-valve engine with balancer shaft.",
    },
];
