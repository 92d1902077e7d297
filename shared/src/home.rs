//! Landing page content and the chief-guest pager.

use crate::capabilities::TimerId;
use crate::deferred_image::{ImageId, ImageSlots};
use crate::GUESTS_PER_PAGE;

pub const ABOUT: &str = "Surabhi 2025 is a two-day National Cultural fest hosted by KL University, \
celebrating student creativity through music, dance, drama, and artistic expression. Featuring \
renowned artists alongside exceptional student talent, the event showcases diversity in a vibrant \
and supportive environment. This year, the fest is focused on overcoming past challenges to deliver \
an enriched and memorable experience for both participants and attendees.";

pub const TRAILER_URL: &str = "https://youtu.be/3LgfXuZPWQE?feature=shared";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub year: u16,
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

pub const TIMELINE: [TimelineEntry; 4] = [
    TimelineEntry {
        year: 2025,
        title: "The Future",
        description: "Celebrating cultural diversity with groundbreaking performances",
        image: "assets/2025.jpg",
    },
    TimelineEntry {
        year: 2024,
        title: "New Heights",
        description: "Introduced new art forms and collaborative performances",
        image: "assets/2024.jpg",
    },
    TimelineEntry {
        year: 2023,
        title: "Growing Strong",
        description: "Expanded to include international participants and professional artists",
        image: "assets/2023.jpg",
    },
    TimelineEntry {
        year: 2022,
        title: "The Beginning",
        description: "First edition of Surabhi with over 1000 participants from across India",
        image: "assets/2022.jpg",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoTeaser {
    pub title: &'static str,
    pub thumbnail: &'static str,
    pub description: &'static str,
}

pub const VIDEO_TEASERS: [VideoTeaser; 3] = [
    VideoTeaser {
        title: "Dance Performances",
        thumbnail: "assets/2024.jpg",
        description: "Spectacular dance performances from previous years",
    },
    VideoTeaser {
        title: "Music Shows",
        thumbnail: "assets/2023.jpg",
        description: "Mesmerizing musical performances",
    },
    VideoTeaser {
        title: "Cultural Events",
        thumbnail: "assets/2025.jpg",
        description: "Highlights of our cultural celebrations",
    },
];

pub const CAROUSEL: [&str; 11] = [
    "assets/2022.jpg",
    "assets/2023.jpg",
    "assets/2024.jpg",
    "assets/2025.jpg",
    "assets/2022.jpg",
    "assets/2022.jpg",
    "assets/2023.jpg",
    "assets/2024.jpg",
    "assets/2025.jpg",
    "assets/2022.jpg",
    "assets/2023.jpg",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChiefGuest {
    pub name: &'static str,
    pub role: &'static str,
    pub image: &'static str,
}

const fn guest(name: &'static str, role: &'static str, image: &'static str) -> ChiefGuest {
    ChiefGuest { name, role, image }
}

pub static CHIEF_GUESTS: [ChiefGuest; 11] = [
    guest("Harsha Chemudu", "Actor", "https://i.imghippo.com/files/jr9046JM.jpg"),
    guest("Ram Miriyala", "Singer", "https://i.imghippo.com/files/zP1283Cn.jpg"),
    guest("Yashwanth", "Dance Choreographer", "https://i.imghippo.com/files/Vmo5988bqM.jpg"),
    guest("Naveen IAS", "IAS", "https://i.imghippo.com/files/HB6883o.jpg"),
    guest("Pranav Kaushik", "Actor", "https://i.imghippo.com/files/uTea5112JY.jpg"),
    guest("Vamsi Pujith", "Actor", "https://i.imghippo.com/files/kzQ3707HM.jpg"),
    guest("Roshini Sahota", "Actress", "https://i.imghippo.com/files/uKRI5964lsY.jpg"),
    guest("Garima Bhardwaj", "Designer", "https://i.imghippo.com/files/ZsZ8557JBE.jpg"),
    guest("Navin Tammala", "Singer", "https://i.imghippo.com/files/cPXP5273wcw.jpg"),
    guest("Deepak", "Music Composer", "https://i.imghippo.com/files/xgP2166aM.jpg"),
    guest("Ananda Vardhan", "Actor", "https://i.imghippo.com/files/oPj6522Es.jpg"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipationStep {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub const PARTICIPATION_STEPS: [ParticipationStep; 6] = [
    ParticipationStep {
        id: 1,
        title: "Explore Events List",
        description: "Browse through our diverse range of cultural events and competitions",
    },
    ParticipationStep {
        id: 2,
        title: "Event Registration",
        description: "Complete the registration process for your chosen events",
    },
    ParticipationStep {
        id: 3,
        title: "Event Schedule",
        description: "Check the detailed schedule to plan your participation",
    },
    ParticipationStep {
        id: 4,
        title: "Select Event",
        description: "Choose your preferred events from the available options",
    },
    ParticipationStep {
        id: 5,
        title: "Event Requirements",
        description: "Review all requirements and guidelines for your selected events",
    },
    ParticipationStep {
        id: 6,
        title: "Attend Event",
        description: "Join us at the venue and showcase your talent",
    },
];

/// Next page start; wraps to the first page once the next page would start
/// at or past the end.
pub fn next_offset(current: usize, len: usize) -> usize {
    if current + GUESTS_PER_PAGE >= len {
        0
    } else {
        current + GUESTS_PER_PAGE
    }
}

/// Previous page start; from the first page jumps to the last full page.
pub fn previous_offset(current: usize, len: usize) -> usize {
    if current < GUESTS_PER_PAGE {
        len.saturating_sub(GUESTS_PER_PAGE)
    } else {
        current - GUESTS_PER_PAGE
    }
}

#[derive(Debug, Default)]
pub struct HomePage {
    pub guest_offset: usize,
    pub carousel_visible: bool,
    pub timeline_images: Vec<ImageId>,
    pub teaser_images: Vec<ImageId>,
    pub guest_images: Vec<ImageId>,
    pub carousel_images: Vec<ImageId>,
    pub ticker: Option<TimerId>,
}

impl HomePage {
    /// Creates the page's images and returns those to mount now. Guests off
    /// the current page stay unmounted until paged in.
    pub fn populate(&mut self, slots: &mut ImageSlots) -> Vec<ImageId> {
        self.guest_offset = 0;
        self.carousel_visible = false;

        self.timeline_images = TIMELINE
            .iter()
            .enumerate()
            .map(|(i, entry)| slots.create(entry.image, entry.title, i == 0))
            .collect();
        self.teaser_images = VIDEO_TEASERS
            .iter()
            .map(|teaser| slots.create(teaser.thumbnail, teaser.title, false))
            .collect();
        self.guest_images = CHIEF_GUESTS
            .iter()
            .map(|g| slots.create(g.image, g.name, false))
            .collect();
        self.carousel_images = CAROUSEL
            .iter()
            .enumerate()
            .map(|(i, src)| slots.create(*src, format!("Carousel image {}", i + 1), false))
            .collect();

        let mut mount = Vec::new();
        mount.extend_from_slice(&self.timeline_images);
        mount.extend_from_slice(&self.teaser_images);
        mount.extend(self.visible_guest_images());
        mount.extend_from_slice(&self.carousel_images);
        mount
    }

    pub fn visible_guests(&self) -> &'static [ChiefGuest] {
        visible_range(&CHIEF_GUESTS, self.guest_offset)
    }

    pub fn visible_guest_images(&self) -> Vec<ImageId> {
        visible_range(&self.guest_images, self.guest_offset).to_vec()
    }

    /// Moves the pager and returns `(left, entered)` guest images.
    pub fn page_guests(&mut self, forward: bool) -> (Vec<ImageId>, Vec<ImageId>) {
        let before = self.visible_guest_images();
        let len = CHIEF_GUESTS.len();
        self.guest_offset = if forward {
            next_offset(self.guest_offset, len)
        } else {
            previous_offset(self.guest_offset, len)
        };
        let after = self.visible_guest_images();
        let left = before.iter().filter(|id| !after.contains(id)).copied().collect();
        let entered = after.iter().filter(|id| !before.contains(id)).copied().collect();
        (left, entered)
    }

    /// Forgets the visit's images and hands back the ticker to cancel.
    pub fn clear(&mut self) -> Option<TimerId> {
        let ticker = self.ticker.take();
        *self = Self::default();
        ticker
    }
}

fn visible_range<T>(items: &[T], offset: usize) -> &[T] {
    let start = offset.min(items.len());
    let end = (start + GUESTS_PER_PAGE).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps_when_page_would_reach_end() {
        assert_eq!(next_offset(0, 11), 3);
        assert_eq!(next_offset(6, 11), 9);
        assert_eq!(next_offset(9, 11), 0);
        assert_eq!(next_offset(0, 3), 0);
    }

    #[test]
    fn test_previous_jumps_to_last_full_page() {
        assert_eq!(previous_offset(0, 11), 8);
        assert_eq!(previous_offset(9, 11), 6);
        assert_eq!(previous_offset(3, 11), 0);
        assert_eq!(previous_offset(0, 2), 0);
    }

    #[test]
    fn test_timeline_runs_newest_first() {
        let years: Vec<u16> = TIMELINE.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![2025, 2024, 2023, 2022]);
    }

    #[test]
    fn test_populate_marks_first_timeline_poster_priority() {
        let mut slots = ImageSlots::default();
        let mut page = HomePage::default();
        let mount = page.populate(&mut slots);

        assert!(slots.get(page.timeline_images[0]).unwrap().priority);
        assert!(!slots.get(page.timeline_images[1]).unwrap().priority);
        assert_eq!(mount.len(), 4 + 3 + 3 + 11);
        assert!(!mount.contains(&page.guest_images[3]));
    }

    #[test]
    fn test_paging_reports_swapped_images() {
        let mut slots = ImageSlots::default();
        let mut page = HomePage::default();
        page.populate(&mut slots);

        let (left, entered) = page.page_guests(true);
        assert_eq!(page.guest_offset, 3);
        assert_eq!(left, page.guest_images[0..3].to_vec());
        assert_eq!(entered, page.guest_images[3..6].to_vec());
        assert_eq!(page.visible_guests()[0].name, "Naveen IAS");
    }

    #[test]
    fn test_last_page_can_be_short() {
        let mut page = HomePage::default();
        page.guest_offset = 9;
        assert_eq!(page.visible_guests().len(), 2);
    }
}
