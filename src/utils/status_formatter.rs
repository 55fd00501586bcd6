/// Badge text for a raw state: first letter upper-cased, the rest untouched.
pub fn format_state(state: &str) -> String {
    let state = state.trim();
    let mut chars = state.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_first_letter() {
        assert_eq!(format_state("running"), "Running");
        assert_eq!(format_state("stopped"), "Stopped");
        assert_eq!(format_state("pending-reboot"), "Pending-reboot");
        assert_eq!(format_state(""), "");
    }
}
