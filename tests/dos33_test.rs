// test of DOS 3.3 file system module
use a2dos::img;
use a2dos::img::DiskImage;
use a2dos::fs::dos3x;
use a2dos::fs::dos3x::types::{Error,CorruptKind,EntryState,FileType,FormatConfig,BinaryData,Encoder};
use a2dos::fs::dos3x::{bitmap,tslist};
use a2kit_macro::DiskStruct;

fn new_disk() -> dos3x::Disk {
    let img = img::dsk_do::DO::create(35,16);
    dos3x::Disk::format_img(Box::new(img),&FormatConfig::default()).expect("failed to format")
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i%251) as u8 + 1).collect()
}

fn check_invariant(disk: &dos3x::Disk) {
    let free = disk.free_sector_count().expect("VTOC");
    let used = disk.used_sector_count().expect("VTOC");
    assert_eq!(free+used,disk.total_sector_count().expect("VTOC"));
}

#[test]
fn format() {
    let disk = new_disk();
    assert_eq!(disk.free_sector_count().unwrap(),528);
    assert_eq!(disk.used_sector_count().unwrap(),32);
    let vtoc = disk.read_vtoc().unwrap();
    assert_eq!((vtoc.track1,vtoc.sector1),(17,15));
    assert_eq!(vtoc.version,3);
    assert_eq!(vtoc.vol,254);
    assert_eq!(vtoc.max_pairs,122);
    assert_eq!((vtoc.last_track,vtoc.last_direction),(18,1));
    assert_eq!(vtoc.bytes,[0,1]);
    assert_eq!(vtoc.bitmap[0..4],[0,0,0,0]);
    assert_eq!(vtoc.bitmap[4..8],[0xff,0xff,0,0]);
    assert_eq!(vtoc.bitmap[17*4..17*4+4],[0,0,0,0]);
    assert_eq!(disk.catalog_sector_count().unwrap(),15);
    assert!(dos3x::Disk::test_img(&img::dsk_do::DO::from_bytes(&disk.to_bytes()).unwrap()));
    assert_eq!(disk.disk_name().unwrap(),"DISK VOLUME 254");
    check_invariant(&disk);
}

#[test]
fn format_catalog_chain() {
    let mut disk = new_disk();
    let first = disk.get_img().read_sector(17,15).unwrap();
    assert_eq!(first[1..3],[17,14]);
    let last = disk.get_img().read_sector(17,1).unwrap();
    assert_eq!(last[1..3],[0,0]);
    // nothing written below the catalog
    let vtoc_buf = disk.get_img().read_sector(17,0).unwrap();
    assert_eq!(vtoc_buf[3],3);
}

#[test]
fn format_variants() {
    let cfg = FormatConfig { catalog_track: 18, volume: 100, ..FormatConfig::default() };
    let disk = dos3x::Disk::format_img(Box::new(img::dsk_do::DO::create(35,16)),&cfg).expect("format");
    assert_eq!(disk.free_sector_count().unwrap(),560-48);
    assert_eq!(disk.volume().unwrap(),100);
    let cfg = FormatConfig { tracks_per_disk: 50, sectors_per_track: 32, ..FormatConfig::default() };
    let mut disk = dos3x::Disk::format_img(Box::new(img::dsk_do::DO::create(50,32)),&cfg).expect("format");
    assert_eq!(disk.free_sector_count().unwrap(),1600-64);
    let dat = pattern(300*256);
    let loc = disk.create_file("BIG",FileType::Binary).unwrap();
    disk.write_file_data(&loc,&dat).unwrap();
    let back = disk.read_file_data(&loc).unwrap();
    assert_eq!(back[0..dat.len()],dat[..]);
    check_invariant(&disk);
    let reloaded = a2dos::create_fs_from_bytestream(&disk.to_bytes(),Some("do")).expect("reload 400K volume");
    assert_eq!(reloaded.free_sector_count().unwrap(),disk.free_sector_count().unwrap());
    // geometry the image cannot hold
    let cfg = FormatConfig { tracks_per_disk: 40, ..FormatConfig::default() };
    match dos3x::Disk::format_img(Box::new(img::dsk_do::DO::create(35,16)),&cfg) {
        Err(Error::Range {..}) => {},
        _ => panic!("expected range error")
    }
    let cfg = FormatConfig { first_catalog_sector: 0, ..FormatConfig::default() };
    assert!(dos3x::Disk::format_img(Box::new(img::dsk_do::DO::create(35,16)),&cfg).is_err());
}

#[test]
fn blank_image_refused() {
    let img = img::dsk_do::DO::create(35,16);
    match dos3x::Disk::from_img(Box::new(img)) {
        Err(Error::VolumeMismatch) => {},
        _ => panic!("blank image should not be accepted")
    }
}

#[test]
fn round_trips() {
    for len in [0,1,255,256,257,130*256+7] {
        let mut disk = new_disk();
        let dat = pattern(len);
        let loc = disk.create_file("F",FileType::Binary).expect("create");
        disk.write_file_data(&loc,&dat).expect("write");
        let data_sectors = (len+255)/256;
        let list_sectors = usize::max(1,(data_sectors+121)/122);
        let entry = disk.read_entry(&loc).unwrap();
        assert_eq!(entry.sector_count(),data_sectors+list_sectors,"length {}",len);
        assert_eq!(disk.free_sector_count().unwrap(),528-data_sectors-list_sectors);
        let back = disk.read_file_data(&loc).expect("read");
        assert_eq!(back.len(),(data_sectors+list_sectors-1)*256,"length {}",len);
        assert_eq!(back[0..len],dat[..],"length {}",len);
        assert!(back[len..].iter().all(|b| *b==0),"length {}",len);
        check_invariant(&disk);
    }
}

#[test]
fn second_list_sector() {
    let mut disk = new_disk();
    let loc = disk.create_file("LONG",FileType::Binary).unwrap();
    disk.write_file_data(&loc,&pattern(123*256)).unwrap();
    let entry = disk.read_entry(&loc).unwrap();
    let head = match entry.state() {
        EntryState::Active(head) => head,
        _ => panic!("entry should be active")
    };
    let chain = tslist::read_chain(disk.get_img().as_ref(),head).unwrap();
    assert_eq!(chain.len(),2);
    assert_eq!(chain[0].1.sector_base,[0,0]);
    assert_eq!(chain[1].1.sector_base,[122,0]);
    assert_eq!(chain[1].1.pair(0).0 > 0,true);
    assert_eq!(chain[1].1.pair(1),(0,0));
}

#[test]
fn overwrite_reuses_head() {
    let mut disk = new_disk();
    let loc = disk.create_file("F",FileType::Text).unwrap();
    let head = disk.read_entry(&loc).unwrap().state();
    assert_eq!(head,EntryState::Active([1,0]));
    disk.write_file_data(&loc,&pattern(5000)).unwrap();
    disk.write_file_data(&loc,&pattern(10)).unwrap();
    assert_eq!(disk.read_entry(&loc).unwrap().state(),head);
    assert_eq!(disk.free_sector_count().unwrap(),526);
    assert_eq!(disk.read_file_data(&loc).unwrap()[0..10],pattern(10)[..]);
}

#[test]
fn binary_exact() {
    let mut disk = new_disk();
    let bin = BinaryData::pack(&[6,5,0,2],768).unwrap();
    disk.put_file("thechip",FileType::Binary,&bin.to_bytes()).expect("put");
    let (code,raw) = disk.get_file("THECHIP").expect("get");
    assert_eq!(code,FileType::Binary as u8);
    let unpacked = BinaryData::from_bytes(&raw).expect("header");
    assert_eq!(unpacked.load_address(),768);
    assert_eq!(unpacked.data,vec![6,5,0,2]);
}

#[test]
fn text_file() {
    let mut disk = new_disk();
    let encoder = Encoder::new(vec![0x8d]);
    let dat = encoder.encode("HELLO FROM EMULATOR").unwrap();
    disk.put_file("thetext",FileType::Text,&dat).expect("put");
    let (code,raw) = disk.get_file("thetext").expect("get");
    assert_eq!(code,0);
    assert_eq!(encoder.decode(&raw).unwrap(),"HELLO FROM EMULATOR\n");
    // retype on overwrite is refused
    match disk.put_file("thetext",FileType::Binary,&[0,0,0,0]) {
        Err(Error::FileTypeMismatch) => {},
        _ => panic!("expected type mismatch")
    }
}

#[test]
fn delete_is_net_neutral() {
    let mut disk = new_disk();
    let free0 = disk.free_sector_count().unwrap();
    let loc = disk.create_file("GONE",FileType::Binary).unwrap();
    disk.write_file_data(&loc,&pattern(40000)).unwrap();
    assert!(disk.free_sector_count().unwrap()<free0);
    disk.delete(&loc).expect("delete");
    assert_eq!(disk.free_sector_count().unwrap(),free0);
    let entry = disk.read_entry(&loc).unwrap();
    assert!(matches!(entry.state(),EntryState::Deleted([1,0])));
    assert_eq!(entry.tsl_track,0xff);
    assert_eq!(entry.name[29],1);
    assert_eq!(disk.list_entries().unwrap().len(),1);
    assert_eq!(disk.list_files().unwrap().len(),0);
    assert!(disk.read_file_data(&loc).unwrap().is_empty());
    match disk.find_entry("GONE") {
        Err(Error::FileNotFound) => {},
        _ => panic!("deleted file was found")
    }
    match disk.delete(&loc) {
        Err(Error::WrongEntryKind) => {},
        _ => panic!("deleting twice should fail")
    }
    check_invariant(&disk);
}

#[test]
fn deleted_slot_reuse() {
    let mut disk = new_disk();
    let a = disk.create_file("A",FileType::Text).unwrap();
    let b = disk.create_file("B",FileType::Text).unwrap();
    assert_eq!((a.track,a.sector,a.slot),(17,15,0));
    assert_eq!(b.slot,1);
    disk.delete_file("A").unwrap();
    let c = disk.create_file("C",FileType::Text).unwrap();
    assert_eq!(c,a);
    let names: Vec<String> = disk.list_files().unwrap().iter().map(|f| f.name.clone()).collect();
    assert_eq!(names,vec!["C","B"]);
    match disk.create_file("b",FileType::Binary) {
        Err(Error::DuplicateName) => {},
        _ => panic!("duplicate name was accepted")
    }
}

#[test]
fn catalog_cycle() {
    let mut disk = new_disk();
    let mut buf = disk.get_img().read_sector(17,1).unwrap();
    buf[1] = 17;
    buf[2] = 15;
    disk.get_img().write_sector(17,1,&buf).unwrap();
    match disk.list_entries() {
        Err(Error::Corrupt { kind: CorruptKind::RecursiveDirectory, track: 17, sector: 15 }) => {},
        _ => panic!("expected corrupt directory")
    }
    assert!(disk.create_file("X",FileType::Text).is_err());
    assert_eq!(disk.free_sector_count().unwrap(),528);
}

#[test]
fn list_cycle() {
    let mut disk = new_disk();
    let loc = disk.create_file("LOOP",FileType::Text).unwrap();
    disk.write_file_data(&loc,&pattern(300)).unwrap();
    let mut buf = disk.get_img().read_sector(1,0).unwrap();
    buf[1] = 1;
    buf[2] = 0;
    disk.get_img().write_sector(1,0,&buf).unwrap();
    match disk.read_file_data(&loc) {
        Err(Error::Corrupt { kind: CorruptKind::RecursiveTrackSectorList, track: 1, sector: 0 }) => {},
        _ => panic!("expected corrupt list")
    }
    let free = disk.free_sector_count().unwrap();
    assert!(disk.delete(&loc).is_err());
    assert_eq!(disk.free_sector_count().unwrap(),free);
}

#[test]
fn catalog_full() {
    let mut disk = new_disk();
    for i in 0..105 {
        disk.create_file(&format!("F{}",i),FileType::Text).expect("create");
    }
    match disk.create_file("F105",FileType::Text) {
        Err(e) => {
            assert!(e.is_disk_full());
            assert!(matches!(e,Error::CatalogFull));
        },
        Ok(_) => panic!("catalog should be full")
    }
    assert_eq!(disk.free_sector_count().unwrap(),528-105);
}

#[test]
fn disk_full_boundary() {
    let mut disk = new_disk();
    let loc = disk.create_file("FILL",FileType::Binary).unwrap();
    // 524 data sectors need 5 list sectors, one more than the disk has
    match disk.write_file_data(&loc,&pattern(524*256)) {
        Err(Error::DiskFull { required, available }) => assert_eq!((required,available),(529,528)),
        _ => panic!("expected disk full")
    }
    assert_eq!(disk.free_sector_count().unwrap(),527);
    assert_eq!(disk.read_entry(&loc).unwrap().sector_count(),1);
    // 523 data sectors and 5 list sectors fill it exactly
    disk.write_file_data(&loc,&pattern(523*256)).expect("should just fit");
    assert_eq!(disk.free_sector_count().unwrap(),0);
    match disk.put_file("MORE",FileType::Binary,&[]) {
        Err(e) => assert!(e.is_disk_full()),
        Ok(_) => panic!("disk should be full")
    }
    assert_eq!(disk.list_files().unwrap().len(),1);
    check_invariant(&disk);
    let back = disk.get_file("FILL").unwrap().1;
    assert_eq!(back[0..523*256],pattern(523*256)[..]);
}

#[test]
fn usage_matches_counts() {
    let mut disk = new_disk();
    disk.put_file("U",FileType::Binary,&pattern(2000)).unwrap();
    let vtoc = disk.read_vtoc().unwrap();
    let walk = bitmap::usage(&vtoc);
    assert_eq!(walk.clone().count(),560);
    assert_eq!(walk.clone().filter(|x| x.2).count(),disk.free_sector_count().unwrap());
    assert_eq!(walk.filter(|x| !x.2).count(),disk.used_sector_count().unwrap());
}

#[test]
fn lock_rename() {
    let mut disk = new_disk();
    let bin = BinaryData::pack(&[6,5,0,2],768).unwrap();
    disk.put_file("THECHIP",FileType::Binary,&bin.to_bytes()).unwrap();
    disk.lock("thechip").unwrap();
    assert!(disk.catalog_to_string().unwrap().contains("*B 002 THECHIP"));
    assert!(matches!(disk.delete_file("THECHIP"),Err(Error::FileLocked)));
    assert!(matches!(disk.rename("THECHIP","CHIP"),Err(Error::FileLocked)));
    assert!(matches!(disk.put_file("THECHIP",FileType::Binary,&[]),Err(Error::FileLocked)));
    disk.unlock("THECHIP").unwrap();
    disk.rename("THECHIP","CHIP").unwrap();
    let listing = disk.catalog_to_string().unwrap();
    assert!(listing.contains(" B 002 CHIP"));
    assert!(listing.contains("DISK VOLUME 254"));
    assert!(matches!(disk.find_entry("THECHIP"),Err(Error::FileNotFound)));
    disk.put_file("OTHER",FileType::Text,&[0xc1]).unwrap();
    assert!(matches!(disk.rename("OTHER","CHIP"),Err(Error::DuplicateName)));
    disk.delete_file("CHIP").unwrap();
    check_invariant(&disk);
}

#[test]
fn po_ordering() {
    let cfg = FormatConfig::default();
    let mut do_disk = new_disk();
    let mut po_disk = dos3x::Disk::format_img(Box::new(img::dsk_po::PO::create(280)),&cfg).unwrap();
    for disk in [&mut do_disk,&mut po_disk] {
        disk.put_file("HELLO",FileType::Text,&pattern(1000)).unwrap();
        disk.put_file("WORLD",FileType::Binary,&pattern(70000)).unwrap();
    }
    let do_bytes = do_disk.to_bytes();
    let po_bytes = po_disk.to_bytes();
    assert_eq!(do_bytes.len(),po_bytes.len());
    assert_ne!(do_bytes,po_bytes);
    // the ordering is found without a hint
    let from_po = a2dos::create_fs_from_bytestream(&po_bytes,None).expect("PO image");
    assert_eq!(from_po.what_am_i(),img::DiskImageType::PO);
    let from_do = a2dos::create_fs_from_bytestream(&do_bytes,Some("dsk")).expect("DO image");
    assert_eq!(from_do.what_am_i(),img::DiskImageType::DO);
    assert_eq!(from_po.get_file("WORLD").unwrap(),from_do.get_file("WORLD").unwrap());
    assert_eq!(from_po.catalog_to_string().unwrap(),from_do.catalog_to_string().unwrap());
}

#[test]
fn stray_track_zero_bits() {
    let mut disk = new_disk();
    let mut vtoc = disk.read_vtoc().unwrap();
    for sec in 0..16 {
        bitmap::set_free(&mut vtoc,0,sec).unwrap();
    }
    disk.write_vtoc(&vtoc).unwrap();
    disk.put_file("KEEP",FileType::Binary,&vec![0x55;10*256]).unwrap();
    assert_eq!(disk.free_sector_count().unwrap(),533);
    // 524 data and 5 list sectors, only 528 can be reached
    match disk.put_file("KEEP",FileType::Binary,&vec![0xaa;524*256]) {
        Err(Error::DiskFull { required, available }) => assert_eq!((required,available),(529,528)),
        _ => panic!("expected disk full")
    }
    let (_,dat) = disk.get_file("KEEP").unwrap();
    assert_eq!(dat,vec![0x55;10*256]);
    assert_eq!(disk.free_sector_count().unwrap(),533);
    disk.put_file("KEEP",FileType::Binary,&vec![0xaa;523*256]).expect("should just fit");
    assert_eq!(disk.free_sector_count().unwrap(),16);
    let (_,dat) = disk.get_file("KEEP").unwrap();
    assert!(dat[0..523*256].iter().all(|b| *b==0xaa));
}

#[test]
fn repeated_pointer_counts_once() {
    let mut disk = new_disk();
    disk.put_file("KEEP",FileType::Binary,&vec![0x55;2*256]).unwrap();
    assert_eq!(disk.free_sector_count().unwrap(),525);
    // second data pointer repeats the first, the list now owns 2 distinct sectors
    let mut buf = disk.get_img().read_sector(1,0).unwrap();
    assert_eq!(buf[12..16],[1,1,1,2]);
    buf[14] = 1;
    buf[15] = 1;
    disk.get_img().write_sector(1,0,&buf).unwrap();
    match disk.put_file("KEEP",FileType::Binary,&vec![0xaa;523*256]) {
        Err(Error::DiskFull { required, available }) => assert_eq!((required,available),(528,527)),
        _ => panic!("expected disk full")
    }
    let (_,dat) = disk.get_file("KEEP").unwrap();
    assert_eq!(dat[0..256],[0x55;256]);
    assert_eq!(disk.free_sector_count().unwrap(),525);
}

#[test]
fn slot_out_of_range() {
    let mut disk = new_disk();
    let loc = dos3x::EntryLocation { track: 17, sector: 15, slot: 7 };
    assert!(matches!(disk.read_entry(&loc),Err(Error::Range { track: 17, sector: 15 })));
    assert!(matches!(disk.write_file_data(&loc,&[1,2,3]),Err(Error::Range { .. })));
    assert!(matches!(disk.delete(&loc),Err(Error::Range { .. })));
    check_invariant(&disk);
}
