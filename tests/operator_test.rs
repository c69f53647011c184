// test of image probing and write back through the disk operator
use a2fs::bios::skew::SectorOrder;
use a2fs::fs::{self,FileInfo,Filetype};
use a2fs::img;
use a2fs::operator::{DiskOperator,Format};

fn entry_bytes(stor: u8,name: &str,typ: u8,key: u16,blocks: u16,eof: usize,access: u8,aux: u16) -> Vec<u8> {
    let mut ans = vec![0;39];
    ans[0] = (stor << 4) + name.len() as u8;
    ans[1..1+name.len()].copy_from_slice(name.as_bytes());
    ans[0x10] = typ;
    ans[0x11..0x13].copy_from_slice(&u16::to_le_bytes(key));
    ans[0x13..0x15].copy_from_slice(&u16::to_le_bytes(blocks));
    ans[0x15..0x18].copy_from_slice(&u32::to_le_bytes(eof as u32)[0..3]);
    ans[0x1e] = access;
    ans[0x1f..0x21].copy_from_slice(&u16::to_le_bytes(aux));
    ans
}

/// ProDOS volume WORK holding a single text file, as a PO buffer
fn prodos_volume() -> Vec<u8> {
    let mut img = img::Dsk::create(SectorOrder::ProDos);
    let mut key = vec![0;512];
    key[4] = 0xf4;
    key[5..9].copy_from_slice(b"WORK");
    key[0x23] = 0x27;
    key[0x24] = 0x0d;
    key[0x25] = 1;
    key[0x27] = 6;
    key[0x29..0x2b].copy_from_slice(&u16::to_le_bytes(280));
    key[0x2b..0x2b+39].copy_from_slice(&entry_bytes(1,"README",0x04,7,1,11,0xc3,0));
    img.write_block(2,&key).expect("write");
    let mut bitmap = vec![0;512];
    bitmap[1] = 0x7f;
    for i in 2..35 {
        bitmap[i] = 0xff;
    }
    img.write_block(6,&bitmap).expect("write");
    img.write_block(7,b"HELLO WORLD").expect("write");
    img.to_bytes()
}

fn names(op: &mut DiskOperator) -> Vec<String> {
    op.catalog().expect("catalog").iter().map(|d| d.name.clone()).collect()
}

#[test]
fn dos_image_in_prodos_order() {
    let mut op = DiskOperator::create_dos33(SectorOrder::ProDos,100).expect("create");
    op.put(&FileInfo::new("FIRST",Filetype::BINARY,vec![1,2,3]),false).expect("put");
    let po_buf = op.to_bytes(None).expect("bytes");
    assert_eq!(po_buf.len(),img::IMAGE_SIZE);

    let (mut op,order) = DiskOperator::open(&po_buf,None,Format::Auto).expect("open");
    assert_eq!(order,SectorOrder::ProDos);
    assert_eq!(op.fs_name(),"DOS 3.3");
    op.put(&FileInfo::new("SECOND",Filetype::ASCII_TEXT,vec![0xc1,0xc2]),false).expect("put");

    // the buffer keeps the order it came in
    let (mut same,order) = DiskOperator::open(&op.to_bytes(None).expect("bytes"),None,Format::Auto).expect("open");
    assert_eq!(order,SectorOrder::ProDos);
    assert_eq!(names(&mut same),vec!["FIRST","SECOND"]);

    // unless asked for another
    let do_buf = op.to_bytes(Some(SectorOrder::Dos)).expect("bytes");
    assert_ne!(do_buf,po_buf);
    let (mut other,order) = DiskOperator::open(&do_buf,None,Format::Dos33).expect("open");
    assert_eq!(order,SectorOrder::Dos);
    assert_eq!(names(&mut other),vec!["FIRST","SECOND"]);
    assert_eq!(other.get("SECOND").expect("get").data,vec![0xc1,0xc2]);
    assert_eq!(other.catalog_to_string().expect("catalog"),same.catalog_to_string().expect("catalog"));
}

#[test]
fn explicit_order() {
    let op = DiskOperator::create_dos33(SectorOrder::Dos,254).expect("create");
    let buf = op.to_bytes(None).expect("bytes");
    let (op,order) = DiskOperator::open(&buf,Some(SectorOrder::Dos),Format::Auto).expect("open");
    assert_eq!(order,SectorOrder::Dos);
    assert_eq!(op.order(),SectorOrder::Dos);
}

#[test]
fn write_back_is_complete() {
    let mut op = DiskOperator::create_dos33(SectorOrder::Dos,254).expect("create");
    op.put(&FileInfo::new("HELLO",Filetype::INTEGER_BASIC,hex::decode("080A0054D827D901").expect("hex")),false).expect("put");
    let mut buf: Vec<u8> = Vec::new();
    op.write_back(&mut buf).expect("write back");
    assert_eq!(buf,op.to_bytes(None).expect("bytes"));
    let (mut op,_) = DiskOperator::open(&buf,None,Format::Auto).expect("open");
    let file = op.get("HELLO").expect("get");
    assert_eq!(file.descriptor.filetype,Filetype::INTEGER_BASIC);
    assert_eq!(hex::encode_upper(&file.data),"080A0054D827D901");
    assert_eq!(op.num_free().expect("free"),526);
}

#[test]
fn prodos_is_read_only() {
    let buf = prodos_volume();
    let (mut op,order) = DiskOperator::open(&buf,None,Format::Auto).expect("open");
    assert_eq!(order,SectorOrder::ProDos);
    assert_eq!(op.fs_name(),"ProDOS");
    assert_eq!(names(&mut op),vec!["README"]);
    assert!(op.catalog_to_string().expect("catalog").contains("/WORK"));
    let file = op.get("README").expect("get");
    assert_eq!(file.data,b"HELLO WORLD".to_vec());
    assert_eq!(file.descriptor.filetype,Filetype::ASCII_TEXT);
    let err = op.put(&FileInfo::new("NEW",Filetype::BINARY,vec![0]),false).expect_err("read only");
    assert!(matches!(err.downcast_ref::<fs::Error>(),Some(fs::Error::Unsupported)));
    let err = op.delete("README").expect_err("read only");
    assert!(matches!(err.downcast_ref::<fs::Error>(),Some(fs::Error::Unsupported)));
    assert!(!op.is_dirty());
    assert_eq!(op.to_bytes(None).expect("bytes"),buf);
}

#[test]
fn requested_format_must_match() {
    let buf = prodos_volume();
    let err = DiskOperator::open(&buf,None,Format::Dos33).err().expect("not DOS");
    assert!(matches!(err.downcast_ref::<fs::Error>(),Some(fs::Error::UnrecognizedFormat)));
    let (op,_) = DiskOperator::open(&buf,None,Format::ProDos).expect("open");
    assert_eq!(op.fs_name(),"ProDOS");
}
