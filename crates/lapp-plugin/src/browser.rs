//! Opening the development URL

use std::fmt;

/// Something that can show a URL to the developer
pub trait BrowserOpener: Send + Sync + fmt::Debug {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the operating system's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that_detached(url)
    }
}
