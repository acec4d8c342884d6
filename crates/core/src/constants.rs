/// Agency recorded when the store row has none
pub const DEFAULT_AGENCY: &str = "Private";

/// Location recorded when the store row has none
pub const DEFAULT_LOCATION: &str = "Unspecified";

/// Canonical date format of a shift
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display date format of a shift
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
