use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which half of the workout detail panel the client asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailMode {
    #[default]
    Descripcion,
    Ejercicios,
}

impl DetailMode {
    /// Reads the `mostrar` query parameter. Anything unrecognised shows the description.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailMode::Descripcion => "descripcion",
            DetailMode::Ejercicios => "ejercicios",
        }
    }
}

impl FromStr for DetailMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "descripcion" => Ok(DetailMode::Descripcion),
            "ejercicios" => Ok(DetailMode::Ejercicios),
            other => Err(CoreError::InvalidInput(
                "mostrar".to_string(),
                format!("unknown display mode '{other}'"),
            )),
        }
    }
}

impl fmt::Display for DetailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of entity an uploaded image belongs to. Decides the upload directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Exercise,
    Workout,
}

impl MediaKind {
    /// Directory (relative to the media root) that receives uploads of this kind.
    pub fn upload_dir(&self) -> &'static str {
        match self {
            MediaKind::Exercise => "imagenes_ejercicio",
            MediaKind::Workout => "imagenes_entrenamiento",
        }
    }
}
