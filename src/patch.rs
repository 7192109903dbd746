//! Three-state patch field for partial update requests.
//!
//! Update requests distinguish "leave the field alone" from "clear the
//! field" explicitly, so an empty value never silently means "no change".

/// Requested change for a single optional field in a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatchField<T> {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Clear the field to its absent state.
    Clear,
    /// Replace the field with the given value.
    Set(T),
}

impl<T> PatchField<T> {
    /// Applies the requested change to an optional slot.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }

    /// Converts a carried value, leaving `Keep` and `Clear` untouched.
    ///
    /// # Errors
    ///
    /// Returns the conversion error when the patch carries a value and
    /// the conversion fails.
    pub fn try_map<U, E>(self, convert: impl FnOnce(T) -> Result<U, E>) -> Result<PatchField<U>, E> {
        Ok(match self {
            Self::Keep => PatchField::Keep,
            Self::Clear => PatchField::Clear,
            Self::Set(value) => PatchField::Set(convert(value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::PatchField;

    #[test]
    fn keep_leaves_existing_value() {
        let mut slot = Some("current".to_owned());
        PatchField::Keep.apply(&mut slot);
        assert_eq!(slot.as_deref(), Some("current"));
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut slot = Some("current".to_owned());
        PatchField::<String>::Clear.apply(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn set_replaces_the_slot() {
        let mut slot: Option<String> = None;
        PatchField::Set("next".to_owned()).apply(&mut slot);
        assert_eq!(slot.as_deref(), Some("next"));
    }

    #[test]
    fn try_map_converts_only_carried_values() {
        let kept: Result<PatchField<usize>, String> =
            PatchField::<String>::Keep.try_map(|_| Err("should not convert".to_owned()));
        assert_eq!(kept, Ok(PatchField::Keep));

        let converted: Result<PatchField<usize>, String> =
            PatchField::Set("next".to_owned()).try_map(|value| Ok(value.len()));
        assert_eq!(converted, Ok(PatchField::Set(4)));
    }

    #[test]
    fn try_map_propagates_conversion_errors() {
        let result: Result<PatchField<usize>, String> =
            PatchField::Set("next".to_owned()).try_map(|_| Err("too long".to_owned()));
        assert_eq!(result, Err("too long".to_owned()));
    }
}
