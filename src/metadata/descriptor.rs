//! Type descriptor utilities.
//!
//! Descriptors use the compact JVM-style grammar: single letters for primitive types
//! (`B`, `C`, `D`, `F`, `I`, `J`, `S`, `Z`), `V` for void, `Lname;` for object types,
//! `[` prefixes for array dimensions, and `(args)ret` for method types. The strippers need
//! exactly two questions answered here: how many declared parameters a method descriptor
//! carries, and whether a descriptor mentions a given unit as an object type.

use crate::Result;

/// Counts the declared parameter types of a method descriptor.
///
/// Each declared type counts once, regardless of how many stack slots its value occupies.
/// The method stripper uses this to size the backward producer walk at a call site.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the descriptor is not a well-formed method
/// descriptor.
///
/// # Examples
///
/// ```rust
/// use stripscope::metadata::descriptor::argument_count;
///
/// assert_eq!(argument_count("()V")?, 0);
/// assert_eq!(argument_count("(II)I")?, 2);
/// assert_eq!(argument_count("(Ldemo/Helper;[DJ)V")?, 3);
/// # Ok::<(), stripscope::Error>(())
/// ```
pub fn argument_count(descriptor: &str) -> Result<usize> {
    let mut chars = descriptor.chars();
    if chars.next() != Some('(') {
        return Err(malformed_error!(
            "method descriptor must start with '(': {descriptor}"
        ));
    }

    let mut count = 0;
    loop {
        // Skip array dimension prefixes; they do not add a parameter.
        let mut c = chars.next().ok_or_else(|| {
            malformed_error!("unterminated method descriptor: {descriptor}")
        })?;
        while c == '[' {
            c = chars.next().ok_or_else(|| {
                malformed_error!("unterminated array type in descriptor: {descriptor}")
            })?;
        }

        match c {
            ')' => return Ok(count),
            'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' => count += 1,
            'L' => {
                if !chars.by_ref().any(|c| c == ';') {
                    return Err(malformed_error!(
                        "unterminated object type in descriptor: {descriptor}"
                    ));
                }
                count += 1;
            }
            other => {
                return Err(malformed_error!(
                    "unexpected character '{other}' in descriptor: {descriptor}"
                ))
            }
        }
    }
}

/// Returns true if the descriptor mentions `qualified_name` as an object type.
///
/// Matches plain object types and array element types, in both field and method
/// descriptors. Whole-class removal uses this to find field declarations of the doomed
/// type.
///
/// # Examples
///
/// ```rust
/// use stripscope::metadata::descriptor::references_type;
///
/// assert!(references_type("Ldemo/Unused;", "demo/Unused"));
/// assert!(references_type("[[Ldemo/Unused;", "demo/Unused"));
/// assert!(references_type("(Ldemo/Unused;)V", "demo/Unused"));
/// assert!(!references_type("Ldemo/UnusedKind;", "demo/Unused"));
/// ```
#[must_use]
pub fn references_type(descriptor: &str, qualified_name: &str) -> bool {
    let mut rest = descriptor;
    while let Some(start) = rest.find('L') {
        let after = &rest[start + 1..];
        let Some(end) = after.find(';') else {
            return false;
        };
        if &after[..end] == qualified_name {
            return true;
        }
        rest = &after[end + 1..];
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_count_primitives() {
        assert_eq!(argument_count("()V").unwrap(), 0);
        assert_eq!(argument_count("(I)V").unwrap(), 1);
        assert_eq!(argument_count("(II)I").unwrap(), 2);
        assert_eq!(argument_count("(BCDFIJSZ)V").unwrap(), 8);
    }

    #[test]
    fn test_argument_count_objects_and_arrays() {
        assert_eq!(argument_count("(Ldemo/Helper;)V").unwrap(), 1);
        assert_eq!(argument_count("([I[[Ljava/lang/String;D)V").unwrap(), 3);
        // Wide primitives count as one declared parameter, not two slots
        assert_eq!(argument_count("(DJ)V").unwrap(), 2);
    }

    #[test]
    fn test_argument_count_malformed() {
        assert!(argument_count("II)V").is_err());
        assert!(argument_count("(II").is_err());
        assert!(argument_count("(Ldemo/Helper)V").is_err());
        assert!(argument_count("(Q)V").is_err());
        assert!(argument_count("([").is_err());
    }

    #[test]
    fn test_references_type_field_descriptors() {
        assert!(references_type("Ldemo/Unused;", "demo/Unused"));
        assert!(references_type("[Ldemo/Unused;", "demo/Unused"));
        assert!(!references_type("I", "demo/Unused"));
        assert!(!references_type("Ldemo/Used;", "demo/Unused"));
        // Prefix of a longer name must not match
        assert!(!references_type("Ldemo/UnusedKind;", "demo/Unused"));
    }

    #[test]
    fn test_references_type_method_descriptors() {
        assert!(references_type("(ILdemo/Unused;)V", "demo/Unused"));
        assert!(references_type("()Ldemo/Unused;", "demo/Unused"));
        assert!(!references_type("(I)V", "demo/Unused"));
    }
}
