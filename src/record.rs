use serde::Serialize;

/// Column order of the output file. Matches the field order of [`Record`].
pub const HEADER: [&str; 5] = ["name", "role", "company", "address", "number"];

/// One realtor's contact entry. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub role: String,
    pub company: String,
    pub address: String,
    pub number: String,
}

/// Records of one page, in document order.
pub type PageRecords = Vec<Record>;
