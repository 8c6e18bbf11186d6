//=========================================================================
// Headless Screen
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::Screen;

//=== HeadlessScreen ======================================================

/// A [`Screen`] with nothing behind it. Counts presents.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScreen {
    title: String,
    size: (u32, u32),
    presents: u64,
}

impl HeadlessScreen {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            size: (width, height),
            presents: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of frames presented so far.
    pub fn presents(&self) -> u64 {
        self.presents
    }
}

impl Screen for HeadlessScreen {
    fn present(&mut self) {
        self.presents += 1;
        trace!(target: "screen", "Present #{}", self.presents);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_presents() {
        let mut screen = HeadlessScreen::new("Test", 320, 240);
        screen.present();
        screen.present();

        assert_eq!(screen.presents(), 2);
        assert_eq!(screen.title(), "Test");
        assert_eq!(screen.size(), (320, 240));
    }
}
