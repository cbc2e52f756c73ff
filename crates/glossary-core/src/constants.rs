//! Constantes del cargador de fixtures.

/// Extensión (sin punto) de los archivos que se consideran fixtures. El resto
/// de archivos del directorio se ignora.
pub const FIXTURE_EXTENSION: &str = "json";

/// Directorio por defecto cuando la configuración no indica otro.
pub const DEFAULT_FIXTURES_DIR: &str = "fixtures";

/// Límite de filas devueltas por `find_one`: con 2 basta para detectar
/// coincidencias múltiples.
pub const FIND_ONE_PROBE_LIMIT: usize = 2;
