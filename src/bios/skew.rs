//! ## Sector Skewing Module
//! 
//! This contains the sector skew table used to locate a DOS logical sector
//! within the different image containers.
//! 
//! The sector skews are kept separate from file systems and disk images because multiple
//! submodules of either can use the same tables.

/// Position of a DOS 3.3 logical sector within a track of a ProDOS ordered image
pub const DOS_LSEC_TO_PO_POS: [usize;16] = [0,14,13,12,11,10,9,8,7,6,5,4,3,2,1,15];

/// Get ProDOS block number and byte offset into block corresponding to
/// track and DOS logical sector.  Returned in tuple (block,offset)
pub fn prodos_block_from_ts(track: usize,sector: usize) -> (usize,usize) {
    let pos = DOS_LSEC_TO_PO_POS[sector];
    (8*track + pos/2, 256*(pos%2))
}

#[test]
fn test_tables() {
    // every position in the track is used exactly once
    let mut seen = [false;16];
    for lsec in 0..16 {
        seen[DOS_LSEC_TO_PO_POS[lsec]] = true;
    }
    assert!(seen.iter().all(|x| *x));
    // VTOC lands in block 0x88, catalog sector 15 in the second half of block 0x8F
    assert_eq!(prodos_block_from_ts(17,0),(0x88,0));
    assert_eq!(prodos_block_from_ts(17,15),(0x8f,256));
}
