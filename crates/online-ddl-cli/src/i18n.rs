// crates/online-ddl-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for localization.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! The online DDL CLI stores user-facing strings in a small translation
//! catalog so every diagnostic is worded consistently. All runtime output
//! should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The locale is chosen once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Parses a locale value, ignoring case and any region tag.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next() {
            Some("en") => Some(Self::En),
            Some("ca") => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Preformatted value substituted for the placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`].
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "online-ddl {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
    ("config.load_failed", "Failed to load configuration: {error}"),
    ("config.invalid_override", "Invalid command-line setting: {error}"),
    ("events.open_failed", "Failed to open event log {path}: {error}"),
    ("events.path_missing", "the file event sink requires events.path"),
    ("connect.start", "Connecting to {endpoint} ({backend})..."),
    ("connect.failed", "Failed to connect to {endpoint}: {error}"),
    ("connect.probe_failed", "Connectivity check against {endpoint} failed: {error}"),
    (
        "connect.hint.auth",
        "Hint: the server rejected the credentials; check the user and password ({user_env} / \
         {password_env}).",
    ),
    (
        "connect.hint.database",
        "Hint: the database or table does not exist; check the database name ({database_env}).",
    ),
    ("insert.setup_failed", "Failed to prepare table {table}: {error}"),
    ("insert.started", "Writing rows into {table}. Press Ctrl-C to stop."),
    ("insert.interrupted", "Interrupt received; finishing the current attempt."),
    (
        "insert.summary",
        "Write loop stopped ({reason}): {committed} rows committed, next key {next_key}, \
         abandoned keys: {abandoned}.",
    ),
    ("insert.summary.none", "none"),
    ("insert.fatal", "Write loop stopped on key {key}: {outcome} (code {code}): {message}"),
    (
        "insert.cooldowns_exhausted",
        "Write loop stopped: key {key} still failing after {cooldowns} cool-downs (code {code}): \
         {message}",
    ),
    ("alter.started", "Adding column {column} to {table}..."),
    (
        "alter.table_missing",
        "Table {table} does not exist or cannot be read (code {code}: {message}). Run \
         `online-ddl insert` first to create it.",
    ),
    ("alter.already_applied", "The alter on {table} was already applied."),
    ("alter.failed", "Alter on {table} failed (code {code}): {message}"),
    ("alter.not_visible", "Column {column} is not visible on {table} after the alter."),
    ("alter.finished", "Alter finished in {elapsed_ms} ms. Columns of {table}:"),
    ("alter.column", "  {name} {column_type}"),
    ("session.close_failed", "Warning: failed to close the session: {error}"),
];

/// Catalan catalog.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "online-ddl {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.invalid_override", "Paràmetre de línia d'ordres no vàlid: {error}"),
    ("events.open_failed", "No s'ha pogut obrir el registre d'esdeveniments {path}: {error}"),
    ("events.path_missing", "el registre d'esdeveniments en fitxer requereix events.path"),
    ("connect.start", "Connectant a {endpoint} ({backend})..."),
    ("connect.failed", "No s'ha pogut connectar a {endpoint}: {error}"),
    ("connect.probe_failed", "La comprovació de connectivitat amb {endpoint} ha fallat: {error}"),
    (
        "connect.hint.auth",
        "Suggeriment: el servidor ha rebutjat les credencials; comproveu l'usuari i la \
         contrasenya ({user_env} / {password_env}).",
    ),
    (
        "connect.hint.database",
        "Suggeriment: la base de dades o la taula no existeix; comproveu el nom de la base de \
         dades ({database_env}).",
    ),
    ("insert.setup_failed", "No s'ha pogut preparar la taula {table}: {error}"),
    ("insert.started", "Escrivint files a {table}. Premeu Ctrl-C per aturar."),
    ("insert.interrupted", "Interrupció rebuda; s'acaba l'intent en curs."),
    (
        "insert.summary",
        "Bucle d'escriptura aturat ({reason}): {committed} files confirmades, clau següent \
         {next_key}, claus abandonades: {abandoned}.",
    ),
    ("insert.summary.none", "cap"),
    (
        "insert.fatal",
        "Bucle d'escriptura aturat a la clau {key}: {outcome} (codi {code}): {message}",
    ),
    (
        "insert.cooldowns_exhausted",
        "Bucle d'escriptura aturat: la clau {key} continua fallant després de {cooldowns} \
         pauses (codi {code}): {message}",
    ),
    ("alter.started", "Afegint la columna {column} a {table}..."),
    (
        "alter.table_missing",
        "La taula {table} no existeix o no es pot llegir (codi {code}: {message}). Executeu \
         primer `online-ddl insert` per crear-la.",
    ),
    ("alter.already_applied", "L'alteració de {table} ja s'havia aplicat."),
    ("alter.failed", "L'alteració de {table} ha fallat (codi {code}): {message}"),
    ("alter.not_visible", "La columna {column} no és visible a {table} després de l'alteració."),
    ("alter.finished", "Alteració acabada en {elapsed_ms} ms. Columnes de {table}:"),
    ("alter.column", "  {name} {column_type}"),
    ("session.close_failed", "Avís: no s'ha pogut tancar la sessió: {error}"),
];

/// Returns the raw catalog entries for `locale`.
#[must_use]
pub const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(current_locale())
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
