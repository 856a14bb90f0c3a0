// src/atom/mod.rs

//! ISO-BMFF atom tree, restricted to what sample loading needs.
//!
//! Atoms are a tagged variant ([`Atom`]). Callers look atoms up by type code
//! and then ask for a capability (`children()`, `as_ohdr()`, ...) instead of
//! down-casting.

pub mod boxes;
pub mod oma;
pub(crate) mod parse;
pub mod read;
pub mod sample_table;
pub mod write;

use crate::aliases::FourCc;

pub use boxes::{FrmaAtom, FtypAtom, HdlrAtom, SchmAtom, TkhdAtom};
pub use oma::{OdafAtom, OddaAtom, OdheAtom, OhdrAtom};
pub use parse::{parse_atoms, MAX_ATOM_DEPTH};
pub use read::AtomHeader;
pub use sample_table::{
    SampleEntry, SampleEntryCategory, StcoAtom, StscAtom, StscEntry, StsdAtom, StszAtom,
};
pub use write::AtomWriter;

/// Atom type codes.
pub mod types {
    use crate::aliases::FourCc;

    pub const FTYP: FourCc = *b"ftyp";
    pub const MOOV: FourCc = *b"moov";
    pub const MDAT: FourCc = *b"mdat";
    pub const TRAK: FourCc = *b"trak";
    pub const TKHD: FourCc = *b"tkhd";
    pub const MDIA: FourCc = *b"mdia";
    pub const HDLR: FourCc = *b"hdlr";
    pub const MINF: FourCc = *b"minf";
    pub const STBL: FourCc = *b"stbl";
    pub const STSD: FourCc = *b"stsd";
    pub const STSZ: FourCc = *b"stsz";
    pub const STSC: FourCc = *b"stsc";
    pub const STCO: FourCc = *b"stco";
    pub const CO64: FourCc = *b"co64";
    pub const SINF: FourCc = *b"sinf";
    pub const FRMA: FourCc = *b"frma";
    pub const SCHM: FourCc = *b"schm";
    pub const SCHI: FourCc = *b"schi";

    pub const ODRM: FourCc = *b"odrm";
    pub const ODHE: FourCc = *b"odhe";
    pub const OHDR: FourCc = *b"ohdr";
    pub const ODDA: FourCc = *b"odda";
    pub const ODKM: FourCc = *b"odkm";
    pub const ODAF: FourCc = *b"odaf";

    /// Major brand of a DCF (whole-file wrapped) file.
    pub const BRAND_ODCF: FourCc = *b"odcf";
    /// Major brand of a PDCF (per-sample protected) file.
    pub const BRAND_OPF2: FourCc = *b"opf2";

    pub const HANDLER_SOUND: FourCc = *b"soun";
    pub const HANDLER_VIDEO: FourCc = *b"vide";
    pub const HANDLER_HINT: FourCc = *b"hint";
    pub const HANDLER_TEXT: FourCc = *b"text";
    pub const HANDLER_SUBTITLE: FourCc = *b"sbtl";

    pub const SCHEME_ODKM: FourCc = *b"odkm";
}

/// Atom whose payload is only child atoms (after an optional full-atom
/// version/flags word).
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerAtom {
    pub kind: FourCc,
    pub children: Vec<Atom>,
}

/// Atom kept only as a location (`mdat`, `free`, anything unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafAtom {
    pub header: AtomHeader,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Container(ContainerAtom),
    Ftyp(FtypAtom),
    Tkhd(TkhdAtom),
    Hdlr(HdlrAtom),
    Stsd(StsdAtom),
    Stsz(StszAtom),
    Stsc(StscAtom),
    Stco(StcoAtom),
    Schm(SchmAtom),
    Frma(FrmaAtom),
    Odhe(OdheAtom),
    Ohdr(OhdrAtom),
    Odda(OddaAtom),
    Odaf(OdafAtom),
    Leaf(LeafAtom),
}

impl Atom {
    pub fn kind(&self) -> FourCc {
        match self {
            Atom::Container(a) => a.kind,
            Atom::Ftyp(_) => types::FTYP,
            Atom::Tkhd(_) => types::TKHD,
            Atom::Hdlr(_) => types::HDLR,
            Atom::Stsd(_) => types::STSD,
            Atom::Stsz(_) => types::STSZ,
            Atom::Stsc(_) => types::STSC,
            Atom::Stco(a) if a.wide => types::CO64,
            Atom::Stco(_) => types::STCO,
            Atom::Schm(_) => types::SCHM,
            Atom::Frma(_) => types::FRMA,
            Atom::Odhe(_) => types::ODHE,
            Atom::Ohdr(_) => types::OHDR,
            Atom::Odda(_) => types::ODDA,
            Atom::Odaf(_) => types::ODAF,
            Atom::Leaf(a) => a.header.kind,
        }
    }

    /// Child atoms, for every variant that can nest atoms.
    pub fn children(&self) -> Option<&[Atom]> {
        match self {
            Atom::Container(a) => Some(&a.children),
            Atom::Odhe(a) => Some(&a.children),
            Atom::Ohdr(a) => Some(&a.children),
            _ => None,
        }
    }

    /// First direct child of the given type.
    pub fn child(&self, kind: &FourCc) -> Option<&Atom> {
        find_child(self.children()?, kind)
    }

    /// Descend through direct children along `path`.
    pub fn find(&self, path: &[FourCc]) -> Option<&Atom> {
        path.iter().try_fold(self, |atom, kind| atom.child(kind))
    }

    pub fn as_ftyp(&self) -> Option<&FtypAtom> {
        match self {
            Atom::Ftyp(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_tkhd(&self) -> Option<&TkhdAtom> {
        match self {
            Atom::Tkhd(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_hdlr(&self) -> Option<&HdlrAtom> {
        match self {
            Atom::Hdlr(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_stsd(&self) -> Option<&StsdAtom> {
        match self {
            Atom::Stsd(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_stsz(&self) -> Option<&StszAtom> {
        match self {
            Atom::Stsz(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_stsc(&self) -> Option<&StscAtom> {
        match self {
            Atom::Stsc(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_stco(&self) -> Option<&StcoAtom> {
        match self {
            Atom::Stco(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_schm(&self) -> Option<&SchmAtom> {
        match self {
            Atom::Schm(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_frma(&self) -> Option<&FrmaAtom> {
        match self {
            Atom::Frma(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_odhe(&self) -> Option<&OdheAtom> {
        match self {
            Atom::Odhe(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_ohdr(&self) -> Option<&OhdrAtom> {
        match self {
            Atom::Ohdr(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_odda(&self) -> Option<&OddaAtom> {
        match self {
            Atom::Odda(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_odaf(&self) -> Option<&OdafAtom> {
        match self {
            Atom::Odaf(a) => Some(a),
            _ => None,
        }
    }
}

/// First atom of the given type in `atoms`.
pub fn find_child<'a>(atoms: &'a [Atom], kind: &FourCc) -> Option<&'a Atom> {
    atoms.iter().find(|atom| atom.kind() == *kind)
}
