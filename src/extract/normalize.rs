//! Record normalization
//!
//! Pure, stateless post-processing of candidate records: title and date
//! trimming plus href absolutization. Applying [`normalize`] to an already
//! normalized record yields the same record.

use crate::extract::AnnouncementRecord;

/// Resolves a path-absolute href against the site origin
///
/// Hrefs starting with `/` are prefixed with `base_origin`; anything else is
/// passed through unchanged.
///
/// # Example
///
/// ```
/// use duyuru_scrape::extract::absolutize;
///
/// let url = absolutize("/tr/duyuru/123", "https://www.ogm.gov.tr");
/// assert_eq!(url, "https://www.ogm.gov.tr/tr/duyuru/123");
/// ```
pub fn absolutize(href: &str, base_origin: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base_origin, href)
    } else {
        href.to_string()
    }
}

/// Joins day/month/year fragments with single spaces and trims the ends
///
/// Interior whitespace is preserved: an empty middle fragment leaves a double
/// space, matching the source site's date markup semantics.
pub fn compose_date(day: &str, month: &str, year: &str) -> String {
    format!("{} {} {}", day, month, year).trim().to_string()
}

/// Normalizes one candidate record into its canonical form
pub fn normalize(record: AnnouncementRecord, base_origin: &str) -> AnnouncementRecord {
    AnnouncementRecord {
        title: record.title.trim().to_string(),
        url: absolutize(&record.url, base_origin),
        date: record.date.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.ogm.gov.tr";

    #[test]
    fn test_absolutize_path_absolute_href() {
        assert_eq!(
            absolutize("/tr/duyuru/123", ORIGIN),
            "https://www.ogm.gov.tr/tr/duyuru/123"
        );
    }

    #[test]
    fn test_absolutize_passes_absolute_href_through() {
        assert_eq!(
            absolutize("https://www.ogm.gov.tr/tr/duyuru/123", ORIGIN),
            "https://www.ogm.gov.tr/tr/duyuru/123"
        );
        assert_eq!(
            absolutize("https://elsewhere.example/abc", ORIGIN),
            "https://elsewhere.example/abc"
        );
    }

    #[test]
    fn test_compose_date_full_fragments() {
        assert_eq!(compose_date("12", "Haziran", "2024"), "12 Haziran 2024");
    }

    #[test]
    fn test_compose_date_empty_month_keeps_inner_double_space() {
        // The join rule trims ends only; the inner double space stays
        assert_eq!(compose_date("12", "", "2024"), "12  2024");
    }

    #[test]
    fn test_compose_date_missing_leading_and_trailing_fragments() {
        assert_eq!(compose_date("", "Haziran", "2024"), "Haziran 2024");
        assert_eq!(compose_date("12", "Haziran", ""), "12 Haziran");
        assert_eq!(compose_date("", "", ""), "");
    }

    #[test]
    fn test_normalize_trims_title_and_date() {
        let record = AnnouncementRecord {
            title: "  Orman Haftası  ".to_string(),
            url: "/tr/duyuru/5".to_string(),
            date: " 12 Haziran 2024 ".to_string(),
        };

        let normalized = normalize(record, ORIGIN);

        assert_eq!(normalized.title, "Orman Haftası");
        assert_eq!(normalized.url, "https://www.ogm.gov.tr/tr/duyuru/5");
        assert_eq!(normalized.date, "12 Haziran 2024");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let record = AnnouncementRecord {
            title: "  Duyuru ".to_string(),
            url: "/tr/duyuru/7".to_string(),
            date: "12  2024".to_string(),
        };

        let once = normalize(record, ORIGIN);
        let twice = normalize(once.clone(), ORIGIN);

        assert_eq!(once, twice);
    }
}
