// src/models/server.rs
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PingQuality {
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    pub value: String,
    pub quality: PingQuality,
}

impl Default for Ping {
    fn default() -> Self {
        Self {
            value: "N/A".to_string(),
            quality: PingQuality::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Online,
    Offline,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub label: String,
    pub state: StatusState,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            label: "Unknown".to_string(),
            state: StatusState::Unknown,
        }
    }
}

fn default_players() -> String {
    "0".to_string()
}

/// One entry of the roster. Fields the engine does not know about (badges,
/// button config, card classes) are kept in `extra` and written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDescriptor {
    pub id: String,
    pub name: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub ping: Ping,
    #[serde(default = "default_players")]
    pub players: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub ping_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerDescriptor {
    /// The probe base URL, if this entry has a usable one.
    pub fn probe_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryEntries {
    Servers(Vec<ServerDescriptor>),
    /// Non-list roster values are carried through untouched.
    Opaque(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub entries: CategoryEntries,
}

impl Category {
    pub fn servers(&self) -> &[ServerDescriptor] {
        match &self.entries {
            CategoryEntries::Servers(servers) => servers,
            CategoryEntries::Opaque(_) => &[],
        }
    }

    pub fn servers_mut(&mut self) -> &mut [ServerDescriptor] {
        match &mut self.entries {
            CategoryEntries::Servers(servers) => servers,
            CategoryEntries::Opaque(_) => &mut [],
        }
    }
}

/// Categories in the order they appear in the roster file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Roster {
    pub categories: Vec<Category>,
}

impl Roster {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn servers(&self) -> impl Iterator<Item = &ServerDescriptor> {
        self.categories.iter().flat_map(|c| c.servers().iter())
    }

    pub fn servers_mut(&mut self) -> impl Iterator<Item = &mut ServerDescriptor> {
        self.categories.iter_mut().flat_map(|c| c.servers_mut().iter_mut())
    }

    pub fn server_count(&self) -> usize {
        self.categories.iter().map(|c| c.servers().len()).sum()
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            match &category.entries {
                CategoryEntries::Servers(servers) => map.serialize_entry(&category.name, servers)?,
                CategoryEntries::Opaque(value) => map.serialize_entry(&category.name, value)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut categories = Vec::with_capacity(raw.len());

        for (name, value) in raw {
            let entries = match value {
                Value::Array(items) => {
                    let servers = items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| {
                            serde_json::from_value::<ServerDescriptor>(item).map_err(|e| {
                                D::Error::custom(format!("category '{}' entry {}: {}", name, i, e))
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    CategoryEntries::Servers(servers)
                }
                other => CategoryEntries::Opaque(other),
            };
            categories.push(Category { name, entries });
        }

        Ok(Self { categories })
    }
}

/// One aggregation result. Serializes to the same shape as the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    roster: Roster,
}

impl Snapshot {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn find(&self, id: &str) -> Option<&ServerDescriptor> {
        self.roster.servers().find(|s| s.id == id)
    }

    pub fn online_count(&self) -> usize {
        self.roster
            .servers()
            .filter(|s| s.status.state == StatusState::Online)
            .count()
    }
}
