//! Geographic and media reference data; no outbound references

use super::{Transform, TransformContext};
use crate::error::MigrationError;
use devav_model::source::{CrestRow, PictureRow, StateRow};
use devav_model::target::{Crest, Picture, State};
use devav_model::{EntityKind, SourceId, StateCode};

pub struct CrestImport;

impl Transform for CrestImport {
    type Row = CrestRow;
    type Target = Crest;
    const DEPENDS_ON: &'static [EntityKind] = &[];

    fn transform(row: CrestRow, _cx: &TransformContext<'_>) -> Result<Crest, MigrationError> {
        Ok(Crest {
            source_id: Some(row.id),
            city_name: row.city_name,
            large_image: row.large_image,
            small_image: row.small_image,
        })
    }
}

/// Legacy states have no key; the short name's position in the legacy
/// enumeration stands in for it
pub struct StateImport;

impl Transform for StateImport {
    type Row = StateRow;
    type Target = State;
    const DEPENDS_ON: &'static [EntityKind] = &[];

    fn transform(row: StateRow, _cx: &TransformContext<'_>) -> Result<State, MigrationError> {
        let code = StateCode::from_short_name(&row.short_name)?;
        Ok(State {
            source_id: Some(SourceId(code.ordinal() as i64)),
            short_name: code,
            long_name: row.long_name,
            large_flag: row.flag_48px,
            small_flag: row.flag_24px,
        })
    }
}

pub struct PictureImport;

impl Transform for PictureImport {
    type Row = PictureRow;
    type Target = Picture;
    const DEPENDS_ON: &'static [EntityKind] = &[];

    fn transform(row: PictureRow, _cx: &TransformContext<'_>) -> Result<Picture, MigrationError> {
        Ok(Picture {
            source_id: Some(row.id),
            data: row.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SourceIndex;
    use devav_model::TransformError;
    use devav_store::MemoryTargetStore;

    #[test]
    fn state_key_is_legacy_ordinal() {
        let index = SourceIndex::new();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);

        let state = StateImport::transform(
            StateRow {
                short_name: "NY".into(),
                long_name: "New York".into(),
                ..StateRow::default()
            },
            &cx,
        )
        .unwrap();
        assert_eq!(state.short_name, StateCode::NY);
        assert_eq!(state.source_id, Some(SourceId(StateCode::NY.ordinal() as i64)));

        let err = StateImport::transform(
            StateRow {
                short_name: "XX".into(),
                ..StateRow::default()
            },
            &cx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::Transform(TransformError::UnknownState(_))
        ));
    }
}
