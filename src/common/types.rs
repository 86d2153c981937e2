/// Record number type.
///
/// Record numbers are 1-based and assigned in insertion order; record 0 of
/// every row file is the header row holding the schema's field names.
pub type RecordNo = usize;

/// Record number of the header row
pub const HEADER_RECNO: RecordNo = 0;

/// Maximum number of fields in a row
pub const ROW_MAX: usize = 10;

/// Width in bytes of one field slot (NUL padded)
pub const COL_MAX: usize = 200;

/// Size in bytes of one serialized row
pub const ROW_BYTES: usize = ROW_MAX * COL_MAX;

/// Set of record numbers produced by predicate evaluation, in result order
pub type RowSet = Vec<RecordNo>;
