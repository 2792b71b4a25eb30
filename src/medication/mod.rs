use lazy_static::lazy_static;
use std::collections::HashMap;

pub const NO_MATCH: &str = "No specific medications found. Consult a doctor.";

lazy_static! {
    /// Condition key (lowercase) -> common medications, in display order
    static ref MEDICATIONS: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("bacterial", &["Amoxicillin", "Ciprofloxacin", "Azithromycin"]);
        m.insert("viral, flu", &["Oseltamivir", "Zanamivir"]);
        m.insert("fever", &["Acetaminophen", "Ibuprofen", "Naproxen"]);
        m.insert("cold", &["Pseudoephedrine", "Dextromethorphan", "Guaifenesin"]);
        m.insert("flu", &["Oseltamivir", "Acetaminophen", "Dextromethorphan"]);
        m.insert("allergies", &["Loratadine", "Cetirizine", "Fluticasone"]);
        m.insert(
            "digestive issues (acid reflux)",
            &["Omeprazole", "Calcium Carbonate", "Magnesium Hydroxide"],
        );
        m.insert("digestive issues (nausea)", &["Ondansetron", "Metoclopramide"]);
        m.insert("digestive issues (diarrhea)", &["Loperamide"]);
        m.insert("digestive issues (constipation)", &["Polyethylene Glycol", "Bisacodyl"]);
        m.insert("pain relief", &["Acetaminophen", "Ibuprofen", "Tramadol"]);
        m.insert("inflammation", &["Ibuprofen", "Naproxen", "Prednisone"]);
        m.insert("hypertension", &["Lisinopril", "Amlodipine", "Hydrochlorothiazide"]);
        m.insert("diabetes", &["Metformin", "Insulin", "Glipizide"]);
        m.insert("skin conditions (acne)", &["Benzoyl Peroxide", "Tretinoin", "Doxycycline"]);
        m.insert("skin conditions (eczema)", &["Hydrocortisone", "Tacrolimus"]);
        m.insert("skin conditions (fungal)", &["Clotrimazole"]);
        m
    };
}

/// Medications for a condition, or the "consult a doctor" advisory.
///
/// Matching is exact after lowercasing.
pub fn lookup(condition: &str) -> Vec<&'static str> {
    MEDICATIONS
        .get(condition.to_lowercase().as_str())
        .map(|meds| meds.to_vec())
        .unwrap_or_else(|| vec![NO_MATCH])
}

/// All condition keys, sorted
pub fn conditions() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = MEDICATIONS.keys().copied().collect();
    keys.sort_unstable();
    keys
}
