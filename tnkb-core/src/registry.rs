//! Registry of regional plate prefixes.

use std::collections::BTreeMap;

use crate::model::RegionRecord;

/// Compiled-in prefix table as `(code, name, province)`.
const REGION_CODES: &[(&str, &str, &str)] = &[
    ("A", "DKI Jakarta", "Jakarta"),
    ("B", "Jawa Barat", "West Java"),
    ("C", "Jawa Tengah", "Central Java"),
    ("D", "Bandung", "West Java"),
    ("E", "Pekalongan", "Central Java"),
    ("F", "Purwokerto", "Central Java"),
    ("G", "Yogyakarta", "Yogyakarta"),
    ("H", "Surabaya", "East Java"),
    ("K", "Semarang", "Central Java"),
    ("L", "Surabaya", "East Java"),
    ("M", "Madura", "East Java"),
    ("N", "Malang", "East Java"),
    ("P", "Banyumas", "Central Java"),
    ("R", "Pati", "Central Java"),
    ("S", "Karanganyar", "Central Java"),
    ("T", "Sidoarjo", "East Java"),
    ("U", "Tegal", "Central Java"),
    ("W", "Mataram", "West Nusa Tenggara"),
    ("AA", "Medan", "North Sumatra"),
    ("AB", "Padang", "West Sumatra"),
    ("AD", "Aceh", "Aceh"),
    ("AE", "Pekanbaru", "Riau"),
    ("AG", "Jambi", "Jambi"),
    ("BA", "Bengkulu", "Bengkulu"),
    ("BB", "Lampung", "Lampung"),
    ("BC", "Palembang", "South Sumatra"),
    ("BD", "Pangkal Pinang", "Bangka Belitung"),
    ("BE", "Bandar Lampung", "Lampung"),
    ("BK", "Batam", "Riau Islands"),
    ("BM", "Banjarmasin", "South Kalimantan"),
    ("BN", "Balikpapan", "East Kalimantan"),
    ("BP", "Pontianak", "West Kalimantan"),
    ("BR", "Samarinda", "East Kalimantan"),
    ("BS", "Palangka Raya", "Central Kalimantan"),
    ("BT", "Banjarmasin", "South Kalimantan"),
    ("CC", "Manado", "North Sulawesi"),
    ("CD", "Gorontalo", "Gorontalo"),
    ("CT", "Palu", "Central Sulawesi"),
    ("DA", "Makassar", "South Sulawesi"),
    ("DB", "Pare-Pare", "South Sulawesi"),
    ("DC", "Kendari", "Southeast Sulawesi"),
    ("DD", "Baubau", "Southeast Sulawesi"),
    ("DE", "Ambon", "Maluku"),
    ("EB", "Manado", "North Sulawesi"),
    ("ED", "Denpasar", "Bali"),
    ("EE", "Mataram", "West Nusa Tenggara"),
    ("EF", "Kupang", "East Nusa Tenggara"),
    ("KB", "Jayapura", "Papua"),
    ("PA", "Pontianak", "West Kalimantan"),
];

/// Read-only registry that resolves region records by plate prefix.
pub struct RegionRegistry {
    regions: BTreeMap<String, RegionRecord>,
}

impl RegionRegistry {
    /// Build a registry from the provided records.
    ///
    /// Codes are uppercased; a later record replaces an earlier one with the same code.
    #[must_use]
    pub fn new(records: Vec<RegionRecord>) -> Self {
        let regions = records
            .into_iter()
            .map(|mut record| {
                record.code = record.code.trim().to_uppercase();
                (record.code.clone(), record)
            })
            .collect();
        Self { regions }
    }

    /// Registry containing every known Indonesian plate prefix.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            REGION_CODES
                .iter()
                .map(|&(code, name, province)| RegionRecord::new(code, name, province))
                .collect(),
        )
    }

    /// Look up a region by code, ignoring case.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&RegionRecord> {
        self.regions.get(&code.trim().to_uppercase())
    }

    /// Whether the code is known, ignoring case.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// All regions sorted by code.
    #[must_use]
    pub fn list_all(&self) -> Vec<RegionRecord> {
        self.iter().cloned().collect()
    }

    /// Iterator over regions in code order.
    fn iter(&self) -> impl Iterator<Item = &RegionRecord> {
        self.regions.values()
    }

    /// Number of known regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the registry holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let registry = RegionRegistry::builtin();
        let upper = registry.lookup("B").expect("B is known");
        let lower = registry.lookup("b").expect("b is known");
        assert_eq!(upper, lower);
        assert_eq!(upper.name, "Jawa Barat");
        assert_eq!(upper.province, "West Java");
        assert_eq!(registry.lookup(" ab "), registry.lookup("AB"));
    }

    #[test]
    fn unknown_codes_are_absent() {
        let registry = RegionRegistry::builtin();
        assert!(registry.lookup("ZZ").is_none());
        assert!(registry.lookup("").is_none());
        assert!(!registry.contains("Q"));
    }

    #[test]
    fn list_is_sorted_and_unique() {
        let registry = RegionRegistry::builtin();
        let regions = registry.list_all();

        assert_eq!(regions.len(), registry.len());
        assert_eq!(regions.len(), REGION_CODES.len());

        let codes: Vec<&str> = regions.iter().map(|region| region.code.as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);

        let unique: HashSet<&str> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
        assert_eq!(codes.first(), Some(&"A"));
    }

    #[test]
    fn later_duplicates_replace_earlier_ones() {
        let registry = RegionRegistry::new(vec![
            RegionRecord::new("x", "First", "One"),
            RegionRecord::new("X", "Second", "Two"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("x").map(|region| region.name.as_str()), Some("Second"));
    }
}
