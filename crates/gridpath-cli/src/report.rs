use gridpath_core::{ExistenceState, PathDescriptor, PathKind};

pub fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes <= 0 {
        return "0 B".to_owned();
    }
    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

/// `kind, state` plus the size for existing leaves.
pub fn describe(desc: &PathDescriptor) -> String {
    let mut text = format!("{}, {}", desc.kind.as_str(), desc.state.as_str());
    if desc.state == ExistenceState::Exist && matches!(desc.kind, PathKind::Object | PathKind::LocalFile)
    {
        text.push_str(", ");
        text.push_str(&format_bytes(desc.size));
    }
    text
}

/// Resolved path when there is one, otherwise what the caller typed.
pub fn display_path(desc: &PathDescriptor) -> &str {
    if desc.is_resolved() {
        &desc.resolved_path
    } else {
        &desc.given_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpath_core::{PathStat, Side};

    #[test]
    fn bytes_use_binary_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn describe_includes_size_only_for_existing_leaves() {
        let mut desc = PathDescriptor::new("/z/obj");
        desc.apply_stat(Side::Remote, Some(&PathStat::leaf(Side::Remote, 10)));
        assert_eq!(describe(&desc), "object, exist, 10 B");

        desc.apply_stat(Side::Remote, None);
        assert_eq!(describe(&desc), "unknown, not-exist");
        assert_eq!(display_path(&desc), "/z/obj");
    }
}
