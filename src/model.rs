//! Archer records and the JSON shapes exchanged between service, gateway and
//! front end.
//!
//! Field names on the wire are the Spanish ones existing front ends read
//! (`nombre`, `apellido`, ...). Collections travel inside a doubly nested
//! [`Envelope`]: `{"data":[{"data":<record>}, ...]}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Opaque record identifier. Stores hand out either integers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArcherId {
    Int(u64),
    Text(String),
}

impl fmt::Display for ArcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// How an archer shoots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    #[serde(rename = "tipo_de_arco")]
    pub bow: String,
    #[serde(rename = "distancia_de_tiro")]
    pub distance: Number,
    #[serde(rename = "tipo_de_flecha")]
    pub arrow: String,
}

impl fmt::Display for Shot {
    /// `"<bow>, <distance>, <arrow>"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.bow, self.distance, self.arrow)
    }
}

/// One competitor, every field populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Archer {
    pub id: ArcherId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    #[serde(rename = "nacionalidad")]
    pub nationality: String,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "disparo")]
    pub shot: Shot,
    #[serde(rename = "puntuaciones_de_la_tanda")]
    pub scores: Vec<Number>,
}

impl Archer {
    pub fn summary(&self) -> ArcherSummary {
        ArcherSummary { name: self.name.clone(), surname: self.surname.clone() }
    }
}

/// The name-only projection served by the summary listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcherSummary {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
}

/// `{"mensaje": "..."}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "mensaje")]
    pub message: String,
}

/// Static metadata served by `/acercade`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct About {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "autor")]
    pub author: String,
    pub email: String,
    #[serde(rename = "fecha")]
    pub date: String,
}

/// One record wrapped as `{"data": record}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// A collection wrapped as `{"data": [{"data": record}, ...]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<Document<T>>,
}

impl<T> Envelope<T> {
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.data.iter().map(|d| &d.data)
    }
}

impl<T> FromIterator<T> for Envelope<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { data: iter.into_iter().map(|data| Document { data }).collect() }
    }
}
