//! Doctor directory search, filtering and sorting.
//!
//! Filters compose conjunctively and sorting is applied to the filtered
//! list. The directory itself is read-only.

use crate::models::Doctor;
use std::cmp::Ordering;

/// Sort keys offered by the "Find a doctor" page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Highest rating first.
    #[default]
    Rating,
    /// Most years of experience first.
    Experience,
    /// Alphabetical by name.
    Name,
}

impl SortKey {
    pub fn from_string(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "rating" => Some(SortKey::Rating),
            "experience" => Some(SortKey::Experience),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }
}

/// Criteria for narrowing the directory. `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    pub search: String,
    pub specialty: Option<String>,
    pub language: Option<String>,
    pub available_only: bool,
    pub sort: SortKey,
}

impl DoctorFilter {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        self.matches_search(doctor)
            && self.specialty.as_deref().map_or(true, |s| doctor.specialty == s)
            && self.language.as_deref().map_or(true, |l| doctor.speaks(l))
            && (!self.available_only || doctor.available)
    }

    fn matches_search(&self, doctor: &Doctor) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&doctor.name, &doctor.specialty, &doctor.subspecialty]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// The static list of doctors shown on the directory page.
#[derive(Debug, Clone, Default)]
pub struct DoctorDirectory {
    doctors: Vec<Doctor>,
}

impl DoctorDirectory {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        DoctorDirectory { doctors }
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.name == name)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    /// Distinct specialties in first-seen order, for the filter dropdown.
    pub fn specialties(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for doctor in &self.doctors {
            if !seen.contains(&doctor.specialty.as_str()) {
                seen.push(&doctor.specialty);
            }
        }
        seen
    }

    /// Distinct languages in first-seen order.
    pub fn languages(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for language in self.doctors.iter().flat_map(|d| d.languages.iter()) {
            if !seen.contains(&language.as_str()) {
                seen.push(language);
            }
        }
        seen
    }

    /// Apply `filter` and sort the survivors.
    pub fn search(&self, filter: &DoctorFilter) -> Vec<&Doctor> {
        let mut found: Vec<&Doctor> = self.doctors.iter().filter(|d| filter.matches(d)).collect();

        match filter.sort {
            SortKey::Rating => found.sort_by(|a, b| {
                b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
            }),
            SortKey::Experience => found.sort_by_key(|d| std::cmp::Reverse(d.experience_years())),
            SortKey::Name => found.sort_by(|a, b| a.name.cmp(&b.name)),
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(id: &str, name: &str, specialty: &str, rating: f32, available: bool, experience: &str, languages: &[&str]) -> Doctor {
        Doctor {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            subspecialty: String::new(),
            rating,
            available,
            experience: experience.to_string(),
            qualifications: vec![],
            languages: languages.iter().map(|l| l.to_string()).collect(),
            schedule: String::new(),
            specializations: vec![],
        }
    }

    fn directory() -> DoctorDirectory {
        let mut cardio = doctor("1", "Dr. Sarah Lee", "Cardiology", 4.8, true, "12 years", &["English", "Korean"]);
        cardio.subspecialty = "Interventional Cardiology".to_string();
        DoctorDirectory::new(vec![
            cardio,
            doctor("2", "Dr. Amit Patel", "Neurology", 4.5, false, "20 years", &["English", "Hindi"]),
            doctor("3", "Dr. Maria Garcia", "Pediatrics", 4.9, true, "8 years", &["Spanish", "English"]),
            doctor("4", "Dr. John Chen", "Cardiology", 4.2, true, "5 years", &["Mandarin"]),
        ])
    }

    fn names(found: &[&Doctor]) -> Vec<String> {
        found.iter().map(|d| d.name.clone()).collect()
    }

    #[test]
    fn empty_filter_returns_everyone_by_rating() {
        let dir = directory();
        let found = dir.search(&DoctorFilter::default());
        assert_eq!(found.len(), 4);
        assert!(found.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let dir = directory();
        let by_name = dir.search(&DoctorFilter { search: "PATEL".to_string(), ..Default::default() });
        assert_eq!(names(&by_name), vec!["Dr. Amit Patel"]);

        let by_specialty = dir.search(&DoctorFilter { search: "cardio".to_string(), ..Default::default() });
        assert_eq!(by_specialty.len(), 2);

        let by_sub = dir.search(&DoctorFilter { search: "interventional".to_string(), ..Default::default() });
        assert_eq!(names(&by_sub), vec!["Dr. Sarah Lee"]);
    }

    #[test]
    fn available_only_never_returns_unavailable() {
        let dir = directory();
        let found = dir.search(&DoctorFilter { available_only: true, ..Default::default() });
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|d| d.available));
    }

    #[test]
    fn filters_compose() {
        let dir = directory();
        let filter = DoctorFilter {
            specialty: Some("Cardiology".to_string()),
            language: Some("English".to_string()),
            available_only: true,
            ..Default::default()
        };
        assert_eq!(names(&dir.search(&filter)), vec!["Dr. Sarah Lee"]);
    }

    #[test]
    fn specialty_filter_is_exact() {
        let dir = directory();
        let filter = DoctorFilter { specialty: Some("cardiology".to_string()), ..Default::default() };
        assert!(dir.search(&filter).is_empty());
    }

    #[test]
    fn sort_by_experience_and_name() {
        let dir = directory();
        let by_exp = dir.search(&DoctorFilter { sort: SortKey::Experience, ..Default::default() });
        assert_eq!(by_exp[0].name, "Dr. Amit Patel");
        assert_eq!(by_exp[3].name, "Dr. John Chen");

        let by_name = dir.search(&DoctorFilter { sort: SortKey::Name, ..Default::default() });
        assert_eq!(
            names(&by_name),
            vec!["Dr. Amit Patel", "Dr. John Chen", "Dr. Maria Garcia", "Dr. Sarah Lee"]
        );
    }

    #[test]
    fn dropdown_values_are_distinct() {
        let dir = directory();
        assert_eq!(dir.specialties(), vec!["Cardiology", "Neurology", "Pediatrics"]);
        assert_eq!(
            dir.languages(),
            vec!["English", "Korean", "Hindi", "Spanish", "Mandarin"]
        );
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!(SortKey::from_string("Experience"), Some(SortKey::Experience));
        assert_eq!(SortKey::from_string("price"), None);
    }
}
