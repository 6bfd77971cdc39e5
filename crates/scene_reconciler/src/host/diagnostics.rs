/// Advisory and error sink.
///
/// Messages go to the `log` facade and are also kept so callers can inspect
/// what the latest commit reported; the host clears them when the next commit
/// starts. Advisories are dropped outside development mode.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    development: bool,
    advisories: Vec<String>,
    errors: Vec<String>,
}

impl Diagnostics {
    /// Create a sink; `development` enables advisories
    pub fn new(development: bool) -> Self {
        Self {
            development,
            ..Self::default()
        }
    }

    /// Whether advisories are emitted
    pub fn is_development(&self) -> bool {
        self.development
    }

    /// Emit a non-fatal development advisory
    pub fn advise(&mut self, message: impl Into<String>) {
        if !self.development {
            return;
        }
        let message = message.into();
        log::warn!("{}", message);
        self.advisories.push(message);
    }

    /// Report a non-fatal error
    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.errors.push(message);
    }

    /// Advisories emitted so far
    pub fn advisories(&self) -> &[String] {
        &self.advisories
    }

    /// Errors reported so far
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Drain the recorded advisories
    pub fn take_advisories(&mut self) -> Vec<String> {
        std::mem::take(&mut self.advisories)
    }

    /// Drain the recorded errors
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    /// Forget everything recorded
    pub fn clear(&mut self) {
        self.advisories.clear();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_drops_advisories_but_keeps_errors() {
        let mut diagnostics = Diagnostics::new(false);
        diagnostics.advise("both set");
        diagnostics.report_error("duplicate id");
        assert!(diagnostics.advisories().is_empty());
        assert_eq!(diagnostics.errors(), &["duplicate id".to_string()]);
    }

    #[test]
    fn test_take_drains_each_buffer() {
        let mut diagnostics = Diagnostics::new(true);
        diagnostics.advise("both set");
        diagnostics.report_error("duplicate id");

        assert_eq!(diagnostics.take_advisories(), vec!["both set".to_string()]);
        assert!(diagnostics.advisories().is_empty());
        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(diagnostics.take_errors(), vec!["duplicate id".to_string()]);
        assert!(diagnostics.errors().is_empty());
    }
}
