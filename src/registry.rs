//! Provider registry: the set of providers one terminal view registers.

use std::rc::Rc;

use crate::host::{LinkHost, Registration};
use crate::provider::{FileLinkProvider, LinkProvider, ProviderConfig, ReferenceLinkProvider};

/// Owns the registration handles of one terminal view. Created when the
/// view mounts, released with [`ProviderRegistry::dispose`] at teardown.
pub struct ProviderRegistry {
    /// Handles in registration order.
    registrations: Vec<Box<dyn Registration>>,
}

impl ProviderRegistry {
    /// Register the file provider, plus the reference provider when
    /// `config` carries a remote base.
    pub fn mount(host: &dyn LinkHost, config: &ProviderConfig) -> Self {
        let mut providers: Vec<Rc<dyn LinkProvider>> = vec![Rc::new(FileLinkProvider::new(config.clone()))];
        if config.remote().is_some() {
            providers.push(Rc::new(ReferenceLinkProvider::new(config.clone())));
        }

        let registrations: Vec<Box<dyn Registration>> = providers
            .into_iter()
            .map(|provider| return host.register_link_provider(provider))
            .collect();
        tracing::debug!(count = registrations.len(), "registered link providers");

        return Self { registrations };
    }

    /// Number of providers currently registered.
    pub fn len(&self) -> usize {
        return self.registrations.len();
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        return self.registrations.is_empty();
    }

    /// Unregister every provider this registry registered. Consumes the
    /// registry, so teardown cannot run twice.
    pub fn dispose(mut self) {
        let count = self.registrations.len();
        for registration in self.registrations.drain(..) {
            registration.dispose();
        }
        tracing::debug!(count, "disposed link providers");
    }
}

impl Drop for ProviderRegistry {
    fn drop(&mut self) {
        if !self.registrations.is_empty() {
            tracing::debug!(
                count = self.registrations.len(),
                "link provider registry dropped without dispose; providers stay registered"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::host::TerminalBuffer;
    use crate::link::LinkActions;
    use crate::platform::Platform;
    use crate::remote::RemoteBase;
    use crate::types::MouseEvent;

    struct OneLine;

    impl TerminalBuffer for OneLine {
        fn line_text(&self, _row: u32) -> Option<String> {
            Some("abc1234 in /a/b.rs:1".to_string())
        }
    }

    struct Silent;

    impl LinkActions for Silent {
        fn hide_tooltip(&self) {}
        fn open_url(&self, _url: &str) {}
        fn show_file_popover(&self, _event: &MouseEvent, _path: &str, _line: Option<u32>) {}
        fn show_tooltip(&self, _event: &MouseEvent, _text: &str, _hint: &str) {}
    }

    #[derive(Default)]
    struct CountingHost {
        disposed: Rc<RefCell<usize>>,
        providers: RefCell<Vec<Rc<dyn LinkProvider>>>,
    }

    struct CountingRegistration {
        disposed: Rc<RefCell<usize>>,
    }

    impl Registration for CountingRegistration {
        fn dispose(self: Box<Self>) {
            *self.disposed.borrow_mut() += 1;
        }
    }

    impl LinkHost for CountingHost {
        fn register_link_provider(&self, provider: Rc<dyn LinkProvider>) -> Box<dyn Registration> {
            self.providers.borrow_mut().push(provider);
            Box::new(CountingRegistration { disposed: Rc::clone(&self.disposed) })
        }
    }

    fn config() -> ProviderConfig {
        ProviderConfig::new(Rc::new(OneLine), Rc::new(Silent), "/w").with_platform(Some(Platform::Linux))
    }

    #[test]
    fn file_provider_only_without_remote() {
        let host = CountingHost::default();
        let registry = ProviderRegistry::mount(&host, &config());
        assert_eq!(registry.len(), 1);

        let links = host.providers.borrow()[0].provide_links(1).unwrap();
        assert_eq!(links.len(), 1);
        registry.dispose();
    }

    #[test]
    fn reference_provider_added_with_remote() {
        let host = CountingHost::default();
        let remote = RemoteBase::parse("https://github.com/o/r").unwrap();
        let registry = ProviderRegistry::mount(&host, &config().with_remote(Some(remote)));
        assert_eq!(registry.len(), 2);

        let reference_links = host.providers.borrow()[1].provide_links(1).unwrap();
        assert_eq!(reference_links[0].text(), "abc1234");

        registry.dispose();
        assert_eq!(*host.disposed.borrow(), 2);
    }

    #[test]
    fn drop_without_dispose_keeps_registrations() {
        let host = CountingHost::default();
        let registry = ProviderRegistry::mount(&host, &config());
        drop(registry);
        assert_eq!(*host.disposed.borrow(), 0);
    }
}
