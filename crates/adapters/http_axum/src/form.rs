//! Posted step forms.
//!
//! Step forms are read as raw name/value pairs so repeated fields (plugin
//! checkboxes) and optional ones need no per-step struct.

/// Footer button pressed on a step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Next,
    Back,
    /// Send a test message from the email step.
    Test,
}

pub(crate) struct FormFields(Vec<(String, String)>);

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl FormFields {
    /// First value posted under `name`, empty when absent.
    pub(crate) fn get(&self, name: &str) -> &str {
        self.all(name).next().unwrap_or_default()
    }

    /// Every value posted under `name`, in form order.
    pub(crate) fn all<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.0
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether a checkbox named `name` was ticked.
    pub(crate) fn checked(&self, name: &str) -> bool {
        self.all(name).next().is_some()
    }

    /// Non-blank value of `name`.
    pub(crate) fn optional(&self, name: &str) -> Option<String> {
        let value = self.get(name).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// The pressed button; a form submitted with the enter key counts as "next".
    pub(crate) fn action(&self) -> Action {
        match self.get("action") {
            "back" => Action::Back,
            "test" => Action::Test,
            _ => Action::Next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn should_collect_repeated_values_in_order() {
        let form = fields(&[("plugin", "b"), ("name", "x"), ("plugin", "a")]);
        assert_eq!(form.all("plugin").collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(form.get("name"), "x");
        assert_eq!(form.get("missing"), "");
    }

    #[test]
    fn should_outlive_the_looked_up_name() {
        let form = fields(&[("name", "Cabin")]);
        let value = {
            let key = String::from("name");
            form.get(&key)
        };
        assert_eq!(value, "Cabin");
    }

    #[test]
    fn should_default_to_next_action() {
        assert_eq!(fields(&[]).action(), Action::Next);
        assert_eq!(fields(&[("action", "back")]).action(), Action::Back);
        assert_eq!(fields(&[("action", "test")]).action(), Action::Test);
    }

    #[test]
    fn should_treat_blank_values_as_absent() {
        let form = fields(&[("emailUsername", "  "), ("emailSecure", "on")]);
        assert_eq!(form.optional("emailUsername"), None);
        assert!(form.checked("emailSecure"));
        assert!(!form.checked("other"));
    }
}
