//! Typed access to the tables of a font

use types::Tag;

use crate::{
    tables::{self, hvhea::HVhea, hvmtx::HVmtx, loca::Loca},
    FontData, FontRead, FontReadWithArgs, ReadError,
};

/// Generates an accessor for each table that parses without outside state.
macro_rules! self_describing_tables {
    ($($name:ident => $module:ident::$table:ident),* $(,)?) => {
        $(
            fn $name(&self) -> Result<tables::$module::$table<'a>, ReadError> {
                self.read_table(tables::$module::TAG)
            }
        )*
    };
}

/// Something that can hand out the bytes of a table given its tag.
///
/// Only [`data_for_tag`](Self::data_for_tag) needs an implementation; every
/// parsed table is derived from it. Tables whose layout depends on another
/// table (`hmtx`, `vmtx` and `loca`) read their arguments through the
/// provider as well.
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    /// Returns the table data, or [`ReadError::TableIsMissing`].
    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    /// Parses the table stored under `tag` as `T`.
    fn read_table<T: FontRead<'a>>(&self, tag: Tag) -> Result<T, ReadError> {
        T::read(self.expect_data_for_tag(tag)?)
    }

    /// Parses the table stored under `tag` as `T`, which needs `args`.
    fn read_table_with_args<T: FontReadWithArgs<'a>>(
        &self,
        tag: Tag,
        args: &T::Args,
    ) -> Result<T, ReadError> {
        T::read_with_args(self.expect_data_for_tag(tag)?, args)
    }

    self_describing_tables! {
        head => head::Head,
        name => name::Name,
        maxp => maxp::Maxp,
        os2 => os2::Os2,
        post => post::Post,
        cmap => cmap::Cmap,
        glyf => glyf::Glyf,
        cff => cff::Cff,
        gdef => gdef::Gdef,
        vorg => vorg::Vorg,
        fvar => fvar::Fvar,
        avar => avar::Avar,
        gvar => gvar::Gvar,
        hvar => hvar::Hvar,
        vvar => vvar::Vvar,
        mvar => mvar::Mvar,
    }

    fn hhea(&self) -> Result<HVhea<'a>, ReadError> {
        self.read_table(tables::hhea::TAG)
    }

    fn vhea(&self) -> Result<HVhea<'a>, ReadError> {
        self.read_table(tables::vhea::TAG)
    }

    /// Horizontal metrics, sized by the long metric count in `hhea`.
    fn hmtx(&self) -> Result<HVmtx<'a>, ReadError> {
        let long_metrics = self.hhea()?.number_of_long_metrics();
        self.read_table_with_args(tables::hmtx::TAG, &long_metrics)
    }

    /// Vertical metrics, sized by the long metric count in `vhea`.
    fn vmtx(&self) -> Result<HVmtx<'a>, ReadError> {
        let long_metrics = self.vhea()?.number_of_long_metrics();
        self.read_table_with_args(tables::vmtx::TAG, &long_metrics)
    }

    /// Glyph locations. The offset size comes from `head` unless `is_long`
    /// is given.
    fn loca(&self, is_long: impl Into<Option<bool>>) -> Result<Loca<'a>, ReadError> {
        let is_long = match is_long.into() {
            Some(is_long) => is_long,
            None => self.head()?.index_to_loc_format() == 1,
        };
        self.read_table_with_args(tables::loca::TAG, &is_long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serves fixed bytes for a handful of tags.
    struct Tables(&'static [(Tag, &'static [u8])]);

    impl TableProvider<'static> for Tables {
        fn data_for_tag(&self, tag: Tag) -> Option<FontData<'static>> {
            self.0
                .iter()
                .find(|(t, _)| *t == tag)
                .map(|(_, data)| FontData::new(data))
        }
    }

    // a header table where only the long metric count (1) is set
    const HVHEA: &[u8] = &[
        0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 1,
    ];

    // one long metric (advance 4, bearing 6) followed by two bare bearings
    const MTX: &[u8] = &[0, 4, 0, 6, 0, 30, 0, 111];

    #[test]
    fn horizontal_metrics_use_hhea_count() {
        let font = Tables(&[(tables::hhea::TAG, HVHEA), (tables::hmtx::TAG, MTX)]);
        let hmtx = font.hmtx().unwrap();
        assert_eq!(hmtx.long_metrics().len(), 1);
        assert_eq!(hmtx.bearings().len(), 2);
    }

    #[test]
    fn vertical_metrics_use_vhea_count() {
        let font = Tables(&[(tables::vhea::TAG, HVHEA), (tables::vmtx::TAG, MTX)]);
        let vmtx = font.vmtx().unwrap();
        assert_eq!(vmtx.long_metrics().len(), 1);
        assert_eq!(vmtx.bearings().len(), 2);
        // the header is required to size the metrics
        let headless = Tables(&[(tables::vmtx::TAG, MTX)]);
        assert_eq!(
            headless.vmtx().err(),
            Some(ReadError::TableIsMissing(tables::vhea::TAG))
        );
    }

    #[test]
    fn missing_table_is_reported_by_tag() {
        let font = Tables(&[]);
        assert_eq!(
            font.cmap().err(),
            Some(ReadError::TableIsMissing(tables::cmap::TAG))
        );
    }
}
