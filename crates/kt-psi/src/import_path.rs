use std::fmt;

use kt_yellow::ast::ImportDirective;

/// What an import directive imports: a qualified name, optionally with every
/// member under it (`a.b.*`), optionally renamed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImportPath {
    fq_name: String,
    all_under: bool,
    alias: Option<String>,
}

impl ImportPath {
    pub fn new(fq_name: impl Into<String>, all_under: bool) -> Self {
        Self { fq_name: fq_name.into(), all_under, alias: None }
    }

    /// Reads `a.b.c` or `a.b.*`.
    pub fn parse(path: &str) -> Self {
        match path.strip_suffix(".*") {
            Some(fq_name) => Self::new(fq_name, true),
            None if path == "*" => Self::new("", true),
            None => Self::new(path, false),
        }
    }

    pub fn from_directive(directive: &ImportDirective) -> Self {
        Self {
            fq_name: directive.imported_fq_name(),
            all_under: directive.is_all_under(),
            alias: directive.alias_name(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn is_all_under(&self) -> bool {
        self.all_under
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The root package has no segments.
    pub fn is_root(&self) -> bool {
        self.fq_name.is_empty()
    }

    /// The name the import makes visible; `None` for `.*` imports.
    pub fn imported_name(&self) -> Option<&str> {
        if self.all_under {
            return None;
        }
        self.alias().or_else(|| self.fq_name.rsplit('.').next())
    }

    pub fn path_str(&self) -> String {
        if self.all_under {
            if self.is_root() { "*".to_owned() } else { format!("{}.*", self.fq_name) }
        } else {
            self.fq_name.clone()
        }
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_str())?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_under() {
        let path = ImportPath::parse("a.b.*");
        assert_eq!(path.fq_name(), "a.b");
        assert!(path.is_all_under());
        assert_eq!(path.path_str(), "a.b.*");
        assert_eq!(path.imported_name(), None);
    }

    #[test]
    fn alias_is_the_imported_name() {
        let path = ImportPath::parse("a.b.C").with_alias("D");
        assert_eq!(path.imported_name(), Some("D"));
        assert_eq!(path.to_string(), "a.b.C as D");
        assert_eq!(ImportPath::parse("a.b.C").imported_name(), Some("C"));
    }

    #[test]
    fn empty_path_is_root() {
        assert!(ImportPath::parse("").is_root());
        assert!(ImportPath::parse("*").is_root());
    }
}
