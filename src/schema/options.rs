/// Switches applied while building a registry.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Running inside a host editor that provides its own file access; image inputs
    /// then never offer local uploads.
    pub embedded_host: bool,
    /// Run [`InputRegistry::initialize_select_defaults`](crate::InputRegistry::initialize_select_defaults)
    /// right after the build.
    pub initialize_selects: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            embedded_host: false,
            initialize_selects: true,
        }
    }
}

impl RegistryOptions {
    pub fn with_embedded_host(mut self, embedded: bool) -> Self {
        self.embedded_host = embedded;
        self
    }

    pub fn with_select_initialization(mut self, enabled: bool) -> Self {
        self.initialize_selects = enabled;
        self
    }
}
