mod cmap;
mod directory;
mod glyf;
mod head;
mod hhea;
mod loca;
mod maxp;
mod name;
mod os2;
mod post;
mod tag;

pub use tag::TableTag;

pub(crate) use cmap::Cmap;
pub(crate) use directory::{search_fields, TableDirectory, TableRecord, SFNT_CFF, SFNT_TRUE_TYPE};
pub(crate) use glyf::component_ids;
pub(crate) use head::Head;
pub(crate) use hhea::Hhea;
pub(crate) use loca::Loca;
pub(crate) use maxp::{Maxp, MAXP_V1};
pub(crate) use name::NameTable;
pub(crate) use os2::Os2;
pub(crate) use post::Post;
