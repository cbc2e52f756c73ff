use serde::{Deserialize, Serialize};

/// Estado final de la carga de un archivo de fixtures.
///
/// - `Success`: commit exitoso y ninguna fila fallida.
/// - `Partial`: commit exitoso con al menos una fila fallida.
/// - `Failed`: el archivo no se pudo cargar (parse, modelo, validación o
///   commit).
/// - `Skipped`: no se intentó cargar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureLoadStatus {
    #[default]
    Success,
    Partial,
    Failed,
    Skipped,
}

impl FixtureLoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for FixtureLoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
