//! Leaf-image classification.
//!
//! No trained model is wired in yet; [`RandomClassifier`] picks one of the
//! known conditions at random so the mobile client can exercise the full
//! predict flow.

use rand::Rng;

/// A classifier verdict with the advice shown to the farmer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnosis {
    pub disease: &'static str,
    pub confidence: f64,
    pub description: &'static str,
    pub recommendations: &'static [&'static str],
}

pub const CATALOG: [Diagnosis; 4] = [
    Diagnosis {
        disease: "Healthy",
        confidence: 0.92,
        description: "Daun jagung sehat.",
        recommendations: &[
            "Lanjutkan perawatan rutin",
            "Monitor kelembaban tanah",
            "Berikan nutrisi secara teratur",
        ],
    },
    Diagnosis {
        disease: "Common Rust",
        confidence: 0.85,
        description: "Terdeteksi gejala Common Rust.",
        recommendations: &[
            "Aplikasikan fungisida",
            "Tingkatkan sirkulasi udara",
            "Buang daun yang terinfeksi",
        ],
    },
    Diagnosis {
        disease: "Gray Leaf Spot",
        confidence: 0.78,
        description: "Terdeteksi Gray Leaf Spot.",
        recommendations: &[
            "Gunakan varietas tahan penyakit",
            "Rotasi tanaman",
            "Aplikasikan fungisida preventif",
        ],
    },
    Diagnosis {
        disease: "Northern Leaf Blight",
        confidence: 0.88,
        description: "Northern Leaf Blight terdeteksi.",
        recommendations: &[
            "Aplikasikan fungisida sistemik",
            "Tingkatkan drainase",
            "Kurangi kelembaban",
        ],
    },
];

pub trait Classifier: Send + Sync {
    fn classify(&self, image: &[u8]) -> Diagnosis;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomClassifier;

impl Classifier for RandomClassifier {
    fn classify(&self, _image: &[u8]) -> Diagnosis {
        CATALOG[rand::thread_rng().gen_range(0..CATALOG.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maize_core::enums::Severity;

    #[test]
    fn random_classifier_stays_in_catalog() {
        for _ in 0..32 {
            let verdict = RandomClassifier.classify(b"leaf");
            assert!(CATALOG.contains(&verdict));
        }
    }

    #[test]
    fn only_gray_leaf_spot_is_medium() {
        let medium: Vec<_> = CATALOG
            .iter()
            .filter(|d| Severity::from_confidence(d.confidence) == Severity::Medium)
            .map(|d| d.disease)
            .collect();
        assert_eq!(medium, vec!["Gray Leaf Spot"]);
    }
}
