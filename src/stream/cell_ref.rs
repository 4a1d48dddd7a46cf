//! A1-style column names and cell references

/// Convert a zero-based column index to its letter name
/// (0 -> A, 25 -> Z, 26 -> AA, 701 -> ZZ, 702 -> AAA).
///
/// Names are bijective base-26 numerals: there is no zero digit, so a
/// remainder of zero borrows from the next position and becomes `Z`.
pub fn column_name(index: u32) -> String {
    let mut buf = Vec::with_capacity(3);
    push_column_name(&mut buf, index);
    // only ASCII uppercase letters are pushed
    buf.into_iter().map(char::from).collect()
}

/// Append the letter name of a zero-based column index to `buffer`
pub fn push_column_name(buffer: &mut Vec<u8>, index: u32) {
    let mut tmp = [0u8; 7];
    let mut len = 0;
    let mut n = u64::from(index) + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        tmp[len] = b'A' + rem as u8;
        len += 1;
        n = (n - 1) / 26;
    }
    for &letter in tmp[..len].iter().rev() {
        buffer.push(letter);
    }
}

/// Inverse of [`column_name`]; `None` for anything but ASCII letters
pub fn column_index(name: &str) -> Option<u32> {
    if name.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for b in name.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        n = n * 26 + u64::from(b.to_ascii_uppercase() - b'A') + 1;
        if n > u64::from(u32::MAX) + 1 {
            return None;
        }
    }
    u32::try_from(n - 1).ok()
}

/// Render a reference from a zero-based column and a one-based row
pub fn cell_reference(col: u32, row: u32) -> String {
    let mut buf = Vec::with_capacity(8);
    push_column_name(&mut buf, col);
    buf.extend_from_slice(itoa::Buffer::new().format(row).as_bytes());
    buf.into_iter().map(char::from).collect()
}
