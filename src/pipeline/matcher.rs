/// Returns true when every requested label occurs among the detected ones.
///
/// Detected labels are expected to be lowercase already (the label provider
/// normalizes them); requested labels are lowercased here before comparison.
/// An empty request is trivially covered.
pub fn covers_requested(detected: &[String], requested: &[String]) -> bool {
    requested.iter().all(|requested_label| {
        let normalized = requested_label.to_lowercase();
        detected.iter().any(|detected_label| *detected_label == normalized)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_request_is_always_covered() {
        assert!(covers_requested(&labels(&["sky", "building"]), &[]));
        assert!(covers_requested(&[], &[]));
    }

    #[test]
    fn nothing_detected_covers_nothing() {
        assert!(!covers_requested(&[], &labels(&["sky"])));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(covers_requested(&labels(&["sky"]), &labels(&["Sky"])));
        assert!(covers_requested(&labels(&["sky"]), &labels(&["SKY"])));
    }

    #[test]
    fn all_requested_labels_must_be_present() {
        let detected = labels(&["sky", "building", "street"]);
        assert!(covers_requested(&detected, &labels(&["sky", "building"])));
        assert!(!covers_requested(&detected, &labels(&["sky", "river"])));
    }

    #[test]
    fn duplicate_requests_do_not_change_the_result() {
        let detected = labels(&["sky"]);
        assert!(covers_requested(&detected, &labels(&["sky", "sky"])));
    }

    #[test]
    fn requires_exact_label_equality() {
        assert!(!covers_requested(&labels(&["skyline"]), &labels(&["sky"])));
    }
}
