//! Source-specific field names
//!
//! Every source addresses the same logical field through its own naming
//! convention: `DATABASE_POOL_SIZE` in the environment, `--database-pool-size`
//! on the command line, `database.pool_size` in a file. An explicit
//! per-field override always wins over the generated name.

use crate::field::{FieldPath, Segment};

/// Naming convention for one loader instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Naming {
    /// Prepended to every generated name
    pub prefix: Option<String>,
    /// Use only the leaf name for nested fields
    pub flatten: bool,
    /// Split declared names into words (`LogLevel` -> `log`, `level`)
    pub camel_case: bool,
}

impl Naming {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn camel_case(mut self, camel_case: bool) -> Self {
        self.camel_case = camel_case;
        self
    }

    /// Environment variable name, e.g. `APP_DATABASE_URL`.
    pub fn env_name(&self, path: &FieldPath) -> String {
        if let Some(name) = path.leaf().env {
            return name.to_string();
        }
        self.join(path, '_', |segment| segment.meta.env).to_uppercase()
    }

    /// Long flag name without dashes, e.g. `database-url`.
    pub fn flag_name(&self, path: &FieldPath) -> String {
        if let Some(name) = path.leaf().flag {
            return name.to_string();
        }
        self.join(path, '-', |segment| segment.meta.flag).to_lowercase()
    }

    fn join(
        &self,
        path: &FieldPath,
        separator: char,
        override_of: impl Fn(&Segment) -> Option<&'static str>,
    ) -> String {
        let named: Vec<&Segment> = path.named_segments().collect();
        let segments = if self.flatten { &named[named.len().saturating_sub(1)..] } else { &named[..] };

        let mut words: Vec<String> = Vec::new();
        if let Some(prefix) = &self.prefix {
            words.push(prefix.clone());
        }
        for segment in segments {
            let text = override_of(*segment).unwrap_or(segment.meta.name);
            if self.camel_case {
                words.extend(split_words(text));
            } else {
                words.push(text.to_string());
            }
        }
        words.join(&separator.to_string())
    }
}

/// File keys from the root table down to the leaf.
///
/// Files always use the nested layout; embedded records contribute no key.
pub fn file_keys(path: &FieldPath) -> Vec<&'static str> {
    path.named_segments().map(|segment| segment.meta.key.unwrap_or(segment.meta.name)).collect()
}

/// Split an identifier into words.
///
/// Breaks at non-alphanumeric characters, at lower-to-upper transitions and
/// before the last capital of an acronym (`HTTPServer` -> `HTTP`, `Server`).
/// Digits stay attached to the word they follow.
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldMeta;

    fn segment(name: &'static str) -> Segment {
        Segment { meta: FieldMeta { name, ..FieldMeta::default() }, embedded: false }
    }

    fn path(segments: Vec<Segment>) -> FieldPath {
        FieldPath::new(segments)
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("LogLevel"), vec!["Log", "Level"]);
        assert_eq!(split_words("log_level"), vec!["log", "level"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("maxIdleConns"), vec!["max", "Idle", "Conns"]);
        assert_eq!(split_words("Port80"), vec!["Port80"]);
        assert_eq!(split_words("ipv4Addr"), vec!["ipv4", "Addr"]);
        assert_eq!(split_words("--"), Vec::<String>::new());
    }

    #[test]
    fn test_env_names() {
        let nested = path(vec![segment("database"), segment("maxIdle")]);
        let camel = Naming::new().camel_case(true);
        assert_eq!(camel.env_name(&nested), "DATABASE_MAX_IDLE");
        assert_eq!(Naming::new().env_name(&nested), "DATABASE_MAXIDLE");
        assert_eq!(camel.clone().prefix("app").env_name(&nested), "APP_DATABASE_MAX_IDLE");
        assert_eq!(camel.flatten(true).env_name(&nested), "MAX_IDLE");
    }

    #[test]
    fn test_flag_names() {
        let nested = path(vec![segment("database"), segment("pool_size")]);
        let camel = Naming::new().camel_case(true);
        assert_eq!(camel.flag_name(&nested), "database-pool-size");
        assert_eq!(Naming::new().flag_name(&nested), "database-pool_size");
        assert_eq!(camel.clone().flatten(true).flag_name(&nested), "pool-size");
        assert_eq!(camel.prefix("svc").flag_name(&nested), "svc-database-pool-size");
    }

    #[test]
    fn test_override_wins_over_convention() {
        let mut leaf = segment("pool_size");
        leaf.meta.env = Some("POOL");
        leaf.meta.flag = Some("pool");
        let nested = path(vec![segment("database"), leaf]);
        let naming = Naming::new().camel_case(true).prefix("app");
        assert_eq!(naming.env_name(&nested), "POOL");
        assert_eq!(naming.flag_name(&nested), "pool");
    }

    #[test]
    fn test_parent_override_replaces_segment() {
        let mut parent = segment("database");
        parent.meta.env = Some("DB");
        parent.meta.flag = Some("db");
        let nested = path(vec![parent, segment("url")]);
        let naming = Naming::new().camel_case(true);
        assert_eq!(naming.env_name(&nested), "DB_URL");
        assert_eq!(naming.flag_name(&nested), "db-url");
    }

    #[test]
    fn test_embedded_segments_are_skipped() {
        let mut base = segment("base");
        base.embedded = true;
        let promoted = path(vec![base, segment("log_level")]);
        let naming = Naming::new().camel_case(true);
        assert_eq!(naming.env_name(&promoted), "LOG_LEVEL");
        assert_eq!(naming.flag_name(&promoted), "log-level");
        assert_eq!(file_keys(&promoted), vec!["log_level"]);
    }

    #[test]
    fn test_file_keys_use_key_override() {
        let mut leaf = segment("pool_size");
        leaf.meta.key = Some("poolSize");
        assert_eq!(file_keys(&path(vec![segment("database"), leaf])), vec!["database", "poolSize"]);
    }
}
