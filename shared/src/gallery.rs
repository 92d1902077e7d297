//! Gallery page: photos per festival category laid out in alternating
//! wide/square rows, with a lightbox for the full-size image.

use serde::{Deserialize, Serialize};

use crate::deferred_image::{ClickAction, ImageId, ImageSlots};
use crate::{GALLERY_ROWS, GALLERY_ROW_STRIDE};

const POSTER: &str = "assets/poster1.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GalleryCategory {
    Natayaka,
    Chitrakala,
    Nritya,
    Raaga,
    CineCarnival,
    Sahithya,
    #[default]
    Vastrashala,
}

impl GalleryCategory {
    pub const ALL: [GalleryCategory; 7] = [
        GalleryCategory::Natayaka,
        GalleryCategory::Chitrakala,
        GalleryCategory::Nritya,
        GalleryCategory::Raaga,
        GalleryCategory::CineCarnival,
        GalleryCategory::Sahithya,
        GalleryCategory::Vastrashala,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            GalleryCategory::Natayaka => "Natayaka",
            GalleryCategory::Chitrakala => "Chitrakala",
            GalleryCategory::Nritya => "Nritya",
            GalleryCategory::Raaga => "Raaga",
            GalleryCategory::CineCarnival => "CineCarnival",
            GalleryCategory::Sahithya => "Sahithya",
            GalleryCategory::Vastrashala => "Vastrashala",
        }
    }

    pub fn label(self) -> String {
        split_camel_case(self.as_str())
    }

    pub fn photos(self) -> &'static [&'static str] {
        match self {
            GalleryCategory::Natayaka => &[
                "https://i.imghippo.com/files/ntv8180co.jpg",
                "https://i.imghippo.com/files/JLnE5821vgI.jpg",
                "https://i.imghippo.com/files/iKNg1976KoI.jpg",
                "https://i.imghippo.com/files/wYBV3499MLk.jpg",
                "https://i.imghippo.com/files/HJaT8011tM.jpg",
                "https://i.imghippo.com/files/UtJ5585PFo.jpg",
            ],
            GalleryCategory::Chitrakala | GalleryCategory::Sahithya => &[POSTER; 12],
            GalleryCategory::Nritya => &[
                "https://i.imghippo.com/files/ex3195bc.jpg",
                "https://i.imghippo.com/files/dXm8770qPM.jpg",
                "https://i.imghippo.com/files/XEZv4283NU.jpg",
                "https://i.imghippo.com/files/kJpN7106VK.jpg",
                "https://i.imghippo.com/files/UPln2931Nxw.jpg",
                "https://i.imghippo.com/files/yg8899L.jpg",
            ],
            GalleryCategory::Raaga => &[
                "https://i.imghippo.com/files/BVuY2188Lj.jpg",
                "https://i.imghippo.com/files/nigY5621pR.jpg",
                "https://i.imghippo.com/files/oPj6522Es.jpg",
                "https://i.imghippo.com/files/XUjc5970O.jpg",
                "https://i.imghippo.com/files/mPRD4110TYU.jpg",
                "https://i.imghippo.com/files/aBGu5336Bu.jpg",
                "https://i.imghippo.com/files/oPj6522Es.jpg",
                "https://i.imghippo.com/files/mPRD4110TYU.jpg",
                "https://i.imghippo.com/files/mPRD4110TYU.jpg",
                "https://i.imghippo.com/files/fQ4379Wsg.jpg",
                "https://i.imghippo.com/files/aBGu5336Bu.jpg",
            ],
            GalleryCategory::CineCarnival => &[
                "https://i.imghippo.com/files/vtIK7188pAI.jpg",
                "https://i.imghippo.com/files/fP5006VmE.jpg",
                "https://i.imghippo.com/files/im2573eg.jpg",
                "https://i.imghippo.com/files/agB4246MHA.jpg",
                "https://i.imghippo.com/files/WHXl6230xw.jpg",
                "https://i.imghippo.com/files/fLa2578Yis.jpg",
                "https://i.imghippo.com/files/sLmQ8981xMs.jpg",
                "https://i.imghippo.com/files/sLmQ8981xMs.jpg",
                "https://i.imghippo.com/files/EUa6624jVk.jpg",
            ],
            GalleryCategory::Vastrashala => &[
                "https://i.imghippo.com/files/IQfu6477O.jpg",
                "https://i.imghippo.com/files/CfF6396wOo.jpg",
                "https://i.imghippo.com/files/Qtt7527iyg.jpg",
                "https://i.imghippo.com/files/VMXL5031AmE.jpg",
                "https://i.imghippo.com/files/OgH5926ac.jpg",
                "https://i.imghippo.com/files/fgjO4196iU.jpg",
                "https://i.imghippo.com/files/FWT8820dzg.jpg",
                "https://i.imghippo.com/files/fgjO4196iU.jpg",
                "https://i.imghippo.com/files/FBO7271rO.jpg",
                "https://i.imghippo.com/files/FBO7271rO.jpg",
                "https://i.imghippo.com/files/wOdD4411wQU.jpg",
            ],
        }
    }
}

/// `CineCarnival` -> `Cine Carnival`.
pub fn split_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() && !out.is_empty() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowLayout {
    WideFirst,
    SquareFirst,
}

impl RowLayout {
    pub const fn for_row(index: usize) -> Self {
        if index % 2 == 0 {
            RowLayout::WideFirst
        } else {
            RowLayout::SquareFirst
        }
    }
}

/// Photo URLs per row: row `r` draws from `photos[3r..3r+3]` and shows the
/// first two of that slice. Rows with no photos are dropped.
pub fn layout_rows(photos: &[&'static str]) -> Vec<(RowLayout, Vec<&'static str>)> {
    (0..GALLERY_ROWS)
        .filter_map(|row| {
            let start = row * GALLERY_ROW_STRIDE;
            let slice = photos.get(start..photos.len().min(start + GALLERY_ROW_STRIDE))?;
            if slice.is_empty() {
                return None;
            }
            Some((RowLayout::for_row(row), slice.iter().take(2).copied().collect()))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRow {
    pub layout: RowLayout,
    pub tiles: Vec<ImageId>,
}

#[derive(Debug, Default)]
pub struct GalleryPage {
    pub selected: GalleryCategory,
    pub rows: Vec<GalleryRow>,
    pub lightbox: Option<String>,
}

impl GalleryPage {
    /// Creates tiles for `category` in `slots`. First-row tiles load eagerly.
    pub fn populate(&mut self, category: GalleryCategory, slots: &mut ImageSlots) {
        self.selected = category;
        self.lightbox = None;
        let alt = format!("{} photo", category.label());
        self.rows = layout_rows(category.photos())
            .into_iter()
            .enumerate()
            .map(|(index, (layout, urls))| GalleryRow {
                layout,
                tiles: urls
                    .into_iter()
                    .map(|url| slots.create_clickable(url, alt.as_str(), index == 0, ClickAction::OpenLightbox))
                    .collect(),
            })
            .collect();
    }

    pub fn tile_ids(&self) -> Vec<ImageId> {
        self.rows.iter().flat_map(|r| r.tiles.iter().copied()).collect()
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.rows.iter().any(|r| r.tiles.contains(&id))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.lightbox = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_and_default() {
        assert_eq!(GalleryCategory::ALL[0], GalleryCategory::Natayaka);
        assert_eq!(GalleryCategory::ALL[6], GalleryCategory::Vastrashala);
        assert_eq!(GalleryCategory::default(), GalleryCategory::Vastrashala);
    }

    #[test]
    fn test_labels_split_camel_case() {
        assert_eq!(GalleryCategory::CineCarnival.label(), "Cine Carnival");
        assert_eq!(GalleryCategory::Raaga.label(), "Raaga");
    }

    #[test]
    fn test_rows_show_first_two_of_each_triple() {
        let photos = ["a", "b", "c", "d", "e", "f", "g"];
        let rows = layout_rows(&photos);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], (RowLayout::WideFirst, vec!["a", "b"]));
        assert_eq!(rows[1], (RowLayout::SquareFirst, vec!["d", "e"]));
        assert_eq!(rows[2], (RowLayout::WideFirst, vec!["g"]));
    }

    #[test]
    fn test_rows_capped_at_four() {
        let photos = [POSTER; 12];
        assert_eq!(layout_rows(&photos).len(), 4);
        assert!(layout_rows(&[]).is_empty());
    }

    #[test]
    fn test_populate_marks_first_row_priority() {
        let mut slots = ImageSlots::default();
        let mut page = GalleryPage::default();
        page.populate(GalleryCategory::Vastrashala, &mut slots);

        // 11 photos: rows of [0,1], [3,4], [6,7], [9,10]
        assert_eq!(page.rows.len(), 4);
        assert_eq!(page.tile_ids().len(), 8);

        let first = page.rows[0].tiles[0];
        let later = page.rows[1].tiles[0];
        assert!(slots.get(first).unwrap().priority);
        assert!(!slots.get(later).unwrap().priority);
        assert_eq!(slots.get(first).unwrap().on_click, Some(ClickAction::OpenLightbox));
    }
}
