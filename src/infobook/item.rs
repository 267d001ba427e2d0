//! Item and fluid descriptors shared by recipes, rewards and displays.

use serde::{Deserialize, Serialize};

const fn default_count() -> u32 {
    1
}

const fn default_amount() -> u32 {
    1000
}

/// An item stack descriptor as found in recipe and reward registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Namespaced item id, e.g. `minecraft:stone`
    pub item: String,
    /// Metadata value disambiguating item variants
    #[serde(default)]
    pub data: i32,
    /// Stack size
    #[serde(default = "default_count")]
    pub count: u32,
    /// Serialized NBT/component data, empty when absent
    #[serde(default)]
    pub nbt: String,
}

impl Item {
    /// An item by id with default metadata, count and NBT.
    pub fn of(id: impl Into<String>) -> Self {
        Self {
            item: id.into(),
            data: 0,
            count: 1,
            nbt: String::new(),
        }
    }

    /// The empty-slot placeholder item.
    pub fn air() -> Self {
        Self::of("minecraft:air")
    }

    pub fn is_air(&self) -> bool {
        self.item == "minecraft:air"
    }

    /// Namespace part of the item id (`minecraft` for unqualified ids).
    pub fn namespace(&self) -> &str {
        self.item.split_once(':').map_or("minecraft", |(ns, _)| ns)
    }

    /// Path part of the item id.
    pub fn path(&self) -> &str {
        self.item.split_once(':').map_or(self.item.as_str(), |(_, path)| path)
    }
}

/// A fluid descriptor with an amount in millibuckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fluid {
    /// Fluid name without namespace, e.g. `menrilresin`
    pub fluid: String,
    /// Amount in mB
    #[serde(default = "default_amount")]
    pub amount: u32,
}

impl Fluid {
    pub fn of(name: impl Into<String>) -> Self {
        Self {
            fluid: name.into(),
            amount: 1000,
        }
    }
}
