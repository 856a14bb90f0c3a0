//! src/atom/parse.rs
//! Atom tree parser: dispatch on the type code, recurse into containers.

use crate::atom::boxes::{FrmaAtom, FtypAtom, HdlrAtom, SchmAtom, TkhdAtom};
use crate::atom::oma::{OdafAtom, OddaAtom, OdheAtom, OhdrAtom};
use crate::atom::read::{read_version_and_flags, AtomHeader};
use crate::atom::sample_table::{StcoAtom, StscAtom, StsdAtom, StszAtom};
use crate::atom::{Atom, ContainerAtom, LeafAtom};
use crate::error::BenchError;
use crate::utils::fourcc_to_string;
use std::io::{Read, Seek};
use tracing::trace;

/// Nesting limit; deeper trees are rejected rather than recursed into.
pub const MAX_ATOM_DEPTH: usize = 32;

/// Parse every atom from the current position up to `end`.
pub fn parse_atoms<R: Read + Seek>(reader: &mut R, end: u64) -> Result<Vec<Atom>, BenchError> {
    parse_children(reader, end, 0)
}

pub(crate) fn parse_children<R: Read + Seek>(
    reader: &mut R,
    end: u64,
    depth: usize,
) -> Result<Vec<Atom>, BenchError> {
    if depth > MAX_ATOM_DEPTH {
        return Err(BenchError::Atom(format!(
            "atom nesting deeper than {MAX_ATOM_DEPTH}"
        )));
    }

    let mut atoms = Vec::new();
    while let Some(header) = AtomHeader::read(reader, end)? {
        atoms.push(parse_atom(reader, &header, depth)?);
        header.skip_to_end(reader)?;
    }
    Ok(atoms)
}

fn parse_atom<R: Read + Seek>(
    reader: &mut R,
    header: &AtomHeader,
    depth: usize,
) -> Result<Atom, BenchError> {
    trace!(
        kind = %fourcc_to_string(&header.kind),
        offset = header.offset,
        size = header.size,
        "atom"
    );

    let atom = match &header.kind {
        b"moov" | b"trak" | b"mdia" | b"minf" | b"stbl" | b"dinf" | b"edts" | b"udta"
        | b"mvex" | b"sinf" | b"schi" => Atom::Container(ContainerAtom {
            kind: header.kind,
            children: parse_children(reader, header.end(), depth + 1)?,
        }),
        b"odrm" | b"odkm" | b"meta" => {
            read_version_and_flags(reader)?;
            Atom::Container(ContainerAtom {
                kind: header.kind,
                children: parse_children(reader, header.end(), depth + 1)?,
            })
        }
        b"ftyp" => Atom::Ftyp(FtypAtom::parse(reader, header)?),
        b"tkhd" => Atom::Tkhd(TkhdAtom::parse(reader)?),
        b"hdlr" => Atom::Hdlr(HdlrAtom::parse(reader, header)?),
        b"stsd" => Atom::Stsd(StsdAtom::parse(reader, header, depth)?),
        b"stsz" => Atom::Stsz(StszAtom::parse(reader, header)?),
        b"stsc" => Atom::Stsc(StscAtom::parse(reader, header)?),
        b"stco" | b"co64" => Atom::Stco(StcoAtom::parse(reader, header)?),
        b"schm" => Atom::Schm(SchmAtom::parse(reader)?),
        b"frma" => Atom::Frma(FrmaAtom::parse(reader)?),
        b"odhe" => Atom::Odhe(OdheAtom::parse(reader, header, depth)?),
        b"ohdr" => Atom::Ohdr(OhdrAtom::parse(reader, header, depth)?),
        b"odda" => Atom::Odda(OddaAtom::parse(reader, header)?),
        b"odaf" => Atom::Odaf(OdafAtom::parse(reader)?),
        _ => Atom::Leaf(LeafAtom { header: *header }),
    };

    let position = reader.stream_position()?;
    if position > header.end() {
        return Err(BenchError::Atom(format!(
            "'{}' at offset {} overruns its size {}",
            fourcc_to_string(&header.kind),
            header.offset,
            header.size
        )));
    }
    Ok(atom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{types, AtomWriter};
    use std::io::Cursor;

    fn parse(bytes: Vec<u8>) -> Result<Vec<Atom>, BenchError> {
        let len = bytes.len() as u64;
        parse_atoms(&mut Cursor::new(bytes), len)
    }

    #[test]
    fn nested_containers_and_leaves() {
        let mut w = AtomWriter::new();
        w.begin(types::MOOV);
        w.begin(types::TRAK);
        w.begin(*b"free").bytes(&[1, 2, 3]).end().unwrap();
        w.end().unwrap();
        w.end().unwrap();
        w.begin(types::MDAT).bytes(&[0u8; 10]).end().unwrap();

        let atoms = parse(w.into_bytes().unwrap()).unwrap();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].kind(), types::MOOV);
        let free = atoms[0].find(&[types::TRAK, *b"free"]).unwrap();
        match free {
            Atom::Leaf(leaf) => assert_eq!(leaf.header.payload_size(), 3),
            other => panic!("expected leaf, got {other:?}"),
        }
        assert_eq!(atoms[1].kind(), types::MDAT);
    }

    #[test]
    fn ohdr_strings_and_odda_location() {
        let mut w = AtomWriter::new();
        w.begin_full(types::ODRM, 0, 0);
        w.begin_full(types::ODHE, 0, 0).u8(9).bytes(b"video/mp4");
        w.begin_full(types::OHDR, 0, 0)
            .u8(1)
            .u8(1)
            .u64(1234)
            .u16(3)
            .u16(0)
            .u16(0)
            .bytes(b"cid");
        w.end().unwrap();
        w.end().unwrap();
        w.begin_full(types::ODDA, 0, 0).u64(4).bytes(&[9, 9, 9, 9]).end().unwrap();
        w.end().unwrap();

        let atoms = parse(w.into_bytes().unwrap()).unwrap();
        let odrm = &atoms[0];
        let odhe = odrm.child(&types::ODHE).and_then(Atom::as_odhe).unwrap();
        assert_eq!(odhe.content_type, "video/mp4");
        let ohdr = odrm
            .find(&[types::ODHE, types::OHDR])
            .and_then(Atom::as_ohdr)
            .unwrap();
        assert_eq!(ohdr.encryption_method, 1);
        assert_eq!(ohdr.plaintext_length, 1234);
        assert_eq!(ohdr.content_id, "cid");
        let odda = odrm.child(&types::ODDA).and_then(Atom::as_odda).unwrap();
        assert_eq!(odda.encrypted_data_length, 4);
        // odrm(12) + odhe(12 + 1 + 9) + ohdr(12 + 16 + 3) + odda header(12) + length(8)
        assert_eq!(odda.data_offset, 12 + 22 + 31 + 12 + 8);
    }

    #[test]
    fn truncated_table_is_an_error() {
        let mut w = AtomWriter::new();
        w.begin_full(types::STSZ, 0, 0).u32(0).u32(1000).end().unwrap();
        assert!(parse(w.into_bytes().unwrap()).is_err());
    }

    #[test]
    fn ftyp_shorter_than_its_fields_is_an_error() {
        let mut w = AtomWriter::new();
        w.begin(types::FTYP).fourcc(*b"isom").end().unwrap();
        w.begin(*b"free").zeros(8).end().unwrap();
        let err = parse(w.into_bytes().unwrap()).unwrap_err();
        assert!(matches!(err, BenchError::Atom(_)), "{err}");
    }

    #[test]
    fn empty_ohdr_is_an_error() {
        let mut w = AtomWriter::new();
        w.begin_full(types::ODHE, 0, 0).u8(0);
        w.begin_full(types::OHDR, 0, 0).end().unwrap();
        w.end().unwrap();
        w.begin(*b"free").zeros(32).end().unwrap();
        assert!(parse(w.into_bytes().unwrap()).is_err());
    }

    #[test]
    fn largesize_overflowing_the_offset_is_an_error() {
        let mut w = AtomWriter::new();
        w.begin(*b"free").zeros(8).end().unwrap();
        let mut bytes = w.into_bytes().unwrap();
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(b"free");
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        let err = parse(bytes).unwrap_err();
        assert!(matches!(err, BenchError::Atom(_)), "{err}");
    }

    #[test]
    fn odda_longer_than_its_atom_is_an_error() {
        let mut w = AtomWriter::new();
        w.begin_full(types::ODDA, 0, 0).u64(1 << 40).zeros(4).end().unwrap();
        assert!(parse(w.into_bytes().unwrap()).is_err());
    }
}
