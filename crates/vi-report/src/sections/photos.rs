//! Inspection photo pages, two photos per page.

use crate::embed::EmbeddedImage;
use crate::record::InspectionPhoto;
use serde::{Deserialize, Serialize};

/// Photos printed per page.
pub const PHOTOS_PER_PAGE: usize = 2;

/// One resolved photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSlot {
    pub label: String,
    pub description: Option<String>,
    pub image: EmbeddedImage,
}

/// A page of up to two photographs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoPage {
    /// 1-based page number among photo pages.
    pub page_number: usize,
    pub total_pages: usize,
    pub slots: Vec<PhotoSlot>,
}

impl PhotoPage {
    /// Unused slots on this page (1 for a trailing odd photo).
    pub fn empty_slots(&self) -> usize {
        PHOTOS_PER_PAGE - self.slots.len()
    }
}

/// First run of digits in a label, e.g. `"Foto 12"` → 12.
pub fn label_number(label: &str) -> Option<u64> {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Photos ordered by label number; unnumbered labels go last. Stable.
pub fn sort_photos(photos: &[InspectionPhoto]) -> Vec<&InspectionPhoto> {
    let mut sorted: Vec<&InspectionPhoto> = photos.iter().collect();
    sorted.sort_by_key(|p| match label_number(&p.label) {
        Some(n) => (0u8, n),
        None => (1u8, 0),
    });
    sorted
}

/// Split already-ordered slots into pages of two.
pub fn paginate(slots: Vec<PhotoSlot>) -> Vec<PhotoPage> {
    let total_pages = slots.len().div_ceil(PHOTOS_PER_PAGE);
    let mut pages = Vec::with_capacity(total_pages);
    let mut iter = slots.into_iter().peekable();
    while iter.peek().is_some() {
        let page_slots: Vec<PhotoSlot> = iter.by_ref().take(PHOTOS_PER_PAGE).collect();
        pages.push(PhotoPage {
            page_number: pages.len() + 1,
            total_pages,
            slots: page_slots,
        });
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(label: &str) -> InspectionPhoto {
        InspectionPhoto {
            label: label.to_string(),
            image: format!("{}.jpg", label),
            description: None,
        }
    }

    fn slot(label: &str) -> PhotoSlot {
        PhotoSlot {
            label: label.to_string(),
            description: None,
            image: EmbeddedImage::Placeholder,
        }
    }

    #[test]
    fn test_label_number() {
        assert_eq!(label_number("3"), Some(3));
        assert_eq!(label_number("Foto 12"), Some(12));
        assert_eq!(label_number("10b"), Some(10));
        assert_eq!(label_number("frontal"), None);
    }

    #[test]
    fn test_sort_is_numeric_and_stable() {
        let photos = vec![photo("10"), photo("motor"), photo("2"), photo("1"), photo("chasis")];
        let labels: Vec<&str> = sort_photos(&photos).iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "10", "motor", "chasis"]);
    }

    #[test]
    fn test_five_photos_make_three_pages() {
        let pages = paginate(["1", "2", "3", "4", "5"].iter().map(|l| slot(l)).collect());
        let sizes: Vec<usize> = pages.iter().map(|p| p.slots.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(pages[2].empty_slots(), 1);
        assert_eq!(pages[2].slots[0].label, "5");
        assert!(pages.iter().all(|p| p.total_pages == 3));
        assert_eq!(pages[1].page_number, 2);
    }

    #[test]
    fn test_no_photos_no_pages() {
        assert!(paginate(Vec::new()).is_empty());
    }
}
