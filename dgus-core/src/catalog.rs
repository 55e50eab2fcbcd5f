//! File catalog
//!
//! The display-ready list of printable files on the card. It is rebuilt
//! wholesale whenever the card is mounted and cleared when it goes away.

use heapless::{String, Vec};

use crate::text::{fit_name, FieldText};
use crate::traits::{CardReader, CARD_NAME_LEN};
use crate::ui::vp;

/// Maximum files shown on the selection page
pub const MAX_FILES: usize = 20;

/// Printable file extensions
const EXTENSIONS: [&str; 2] = [".gcode", ".GCODE"];

/// One file on the selection page
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CatalogEntry {
    /// Name shown on the panel
    pub display: FieldText,
    /// Name used to open the file
    pub card_name: String<CARD_NAME_LEN>,
    /// Text variable holding the name
    pub address: u16,
}

/// Printable files on the card
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    entries: Vec<CatalogEntry, MAX_FILES>,
    selected: Option<usize>,
}

impl FileCatalog {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            selected: None,
        }
    }

    /// Rebuild from the card, newest entry first
    ///
    /// Entries without a printable extension are skipped and do not count
    /// toward [`MAX_FILES`].
    pub fn rebuild<C: CardReader + ?Sized>(&mut self, card: &mut C) {
        self.clear();

        let count = card.file_count();
        for i in 0..count {
            if self.entries.is_full() {
                break;
            }

            let Some(entry) = card.entry(count - 1 - i) else {
                continue;
            };
            let Some(stem) = printable_stem(&entry.long_name) else {
                continue;
            };

            let address = vp::file_text(self.entries.len());
            // Fullness checked at the top of the loop
            let _ = self.entries.push(CatalogEntry {
                display: fit_name(stem),
                card_name: entry.card_name,
                address,
            });
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("catalog: {} files", self.entries.len());
    }

    /// Drop every entry and the selection
    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Index of the selected entry
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The selected entry
    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Select an entry, or clear the selection with `None`
    ///
    /// Returns false without changing anything if the index is out of range.
    pub fn select(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(i) if i >= self.entries.len() => false,
            _ => {
                self.selected = index;
                true
            }
        }
    }

    /// Find an entry by card name
    pub fn find(&self, card_name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.card_name == card_name)
    }
}

/// Display stem of a printable file name
///
/// The extension must follow at least one character of name.
fn printable_stem(name: &str) -> Option<&str> {
    let bytes = name.as_bytes();
    (1..bytes.len()).find_map(|j| {
        let rest = &bytes[j..];
        EXTENSIONS
            .iter()
            .any(|ext| rest.starts_with(ext.as_bytes()))
            .then(|| &name[..j])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::bounded;
    use crate::traits::CardEntry;

    struct ListCard<'a> {
        names: &'a [(&'a str, &'a str)],
    }

    impl CardReader for ListCard<'_> {
        fn is_mounted(&self) -> bool {
            true
        }

        fn mount(&mut self) {}

        fn file_count(&mut self) -> u16 {
            self.names.len() as u16
        }

        fn entry(&mut self, index: u16) -> Option<CardEntry> {
            self.names.get(index as usize).map(|(long, short)| CardEntry {
                long_name: bounded(long),
                card_name: bounded(short),
            })
        }
    }

    #[test]
    fn test_stem() {
        assert_eq!(printable_stem("part.gcode"), Some("part"));
        assert_eq!(printable_stem("PART.GCODE"), Some("PART"));
        assert_eq!(printable_stem("notes.txt"), None);
        assert_eq!(printable_stem(".gcode"), None);
        assert_eq!(printable_stem("Part.Gcode"), None);
    }

    #[test]
    fn test_rebuild_newest_first_and_filtered() {
        let names = [
            ("old.gcode", "OLD.GCO"),
            ("readme.txt", "README.TXT"),
            ("new.GCODE", "NEW.GCO"),
        ];
        let mut card = ListCard { names: &names };
        let mut catalog = FileCatalog::new();
        catalog.rebuild(&mut card);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].display.as_str(), "new");
        assert_eq!(catalog.entries()[0].address, vp::FILE1_TEXT);
        assert_eq!(catalog.entries()[1].card_name.as_str(), "OLD.GCO");
        assert_eq!(catalog.entries()[1].address, vp::FILE1_TEXT + 10);
    }

    #[test]
    fn test_rebuild_caps_at_max_files() {
        let names = [("f.gcode", "F.GCO"); 30];
        let mut card = ListCard { names: &names };
        let mut catalog = FileCatalog::new();
        catalog.rebuild(&mut card);
        assert_eq!(catalog.len(), MAX_FILES);
    }

    #[test]
    fn test_skipped_files_do_not_use_slots() {
        let mut names = [("skip.txt", "SKIP.TXT"); 25];
        names[0] = ("keep.gcode", "KEEP.GCO");
        let mut card = ListCard { names: &names };
        let mut catalog = FileCatalog::new();
        catalog.rebuild(&mut card);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_select_bounds() {
        let names = [("a.gcode", "A.GCO"), ("b.gcode", "B.GCO")];
        let mut card = ListCard { names: &names };
        let mut catalog = FileCatalog::new();
        catalog.rebuild(&mut card);

        assert!(catalog.select(Some(1)));
        assert_eq!(catalog.selected_entry().unwrap().card_name.as_str(), "A.GCO");
        assert!(!catalog.select(Some(2)));
        assert_eq!(catalog.selected(), Some(1));
        assert!(catalog.select(None));
        assert_eq!(catalog.selected(), None);
    }

    #[test]
    fn test_find_by_card_name() {
        let names = [("a.gcode", "A.GCO")];
        let mut card = ListCard { names: &names };
        let mut catalog = FileCatalog::new();
        catalog.rebuild(&mut card);
        assert!(catalog.find("A.GCO").is_some());
        assert!(catalog.find("B.GCO").is_none());
    }
}
