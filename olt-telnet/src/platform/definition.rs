//! Platform definition for vendor-specific CLI vocabulary.

/// Platform definition containing the vendor-specific dialog vocabulary.
///
/// The driver itself knows nothing about a particular firmware; every phrase it
/// reacts to comes from here, so a firmware or site variant is a different
/// value, not a code change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OltPlatform {
    /// Platform name (e.g., "zte_c300").
    pub name: String,

    /// Phrases announcing a confirmation dialog.
    pub confirmation_phrases: Vec<String>,

    /// Markers of the explicit reply prompt that follows a confirmation.
    pub yes_no_markers: Vec<String>,

    /// Text sent to accept a confirmation.
    pub affirmative_reply: String,

    /// Prompt for the username during login (drained up to, if seen).
    pub username_prompt: Option<String>,

    /// Prompt for the password during login (drained up to, if seen).
    pub password_prompt: Option<String>,

    /// Phrases meaning "nothing to show" in scan output.
    pub no_data_markers: Vec<String>,

    /// Line prefixes of device error codes that also mean "nothing to show".
    pub error_code_prefixes: Vec<String>,

    /// Phrases meaning the ONU or its services already exist.
    pub already_exists_markers: Vec<String>,

    /// Maximum bytes kept in the rolling match fragment. Must be at least
    /// twice the longest phrase.
    pub fragment_depth: usize,
}

impl OltPlatform {
    /// Create a new platform definition with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confirmation_phrases: vec![],
            yes_no_markers: vec![],
            affirmative_reply: "yes".to_string(),
            username_prompt: None,
            password_prompt: None,
            no_data_markers: vec![],
            error_code_prefixes: vec![],
            already_exists_markers: vec![],
            fragment_depth: 1000,
        }
    }

    /// Add a confirmation-message phrase.
    pub fn with_confirmation_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.confirmation_phrases.push(phrase.into());
        self
    }

    /// Add a yes/no reply marker.
    pub fn with_yes_no_marker(mut self, marker: impl Into<String>) -> Self {
        self.yes_no_markers.push(marker.into());
        self
    }

    /// Set the affirmative reply.
    pub fn with_affirmative_reply(mut self, reply: impl Into<String>) -> Self {
        self.affirmative_reply = reply.into();
        self
    }

    /// Set the login field prompts.
    pub fn with_login_prompts(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username_prompt = Some(username.into());
        self.password_prompt = Some(password.into());
        self
    }

    /// Add a "no data" marker.
    pub fn with_no_data_marker(mut self, marker: impl Into<String>) -> Self {
        self.no_data_markers.push(marker.into());
        self
    }

    /// Add an error-code line prefix.
    pub fn with_error_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_code_prefixes.push(prefix.into());
        self
    }

    /// Add an "already exists" marker.
    pub fn with_already_exists_marker(mut self, marker: impl Into<String>) -> Self {
        self.already_exists_markers.push(marker.into());
        self
    }

    /// Set the fragment depth. Values below [`min_fragment_depth`](Self::min_fragment_depth)
    /// are raised to it when the dialog handler is built.
    pub fn with_fragment_depth(mut self, depth: usize) -> Self {
        self.fragment_depth = depth;
        self
    }

    /// Smallest fragment depth that still holds every dialog phrase after the
    /// fragment drops its oldest half.
    pub fn min_fragment_depth(&self) -> usize {
        self.confirmation_phrases
            .iter()
            .chain(&self.yes_no_markers)
            .map(String::len)
            .max()
            .unwrap_or(0)
            * 2
    }

    /// Whether `output` reports an entry that already exists.
    pub fn reports_existing(&self, output: &str) -> bool {
        self.already_exists_markers
            .iter()
            .any(|m| output.contains(m.as_str()))
    }
}
