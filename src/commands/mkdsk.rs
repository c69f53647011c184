use clap;
use std::str::FromStr;
use log::error;
use crate::bios::skew::SectorOrder;
use crate::operator::DiskOperator;
use crate::img;
use super::CommandError;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

/// Write a blank DOS 3.3 image.  The order comes from `--order`, or else the extension.
pub fn mkdsk(cmd: &clap::ArgMatches) -> STDRESULT {
    let dest_path = cmd.get_one::<String>("dimg").expect(RCH);
    let vol = match u8::from_str(cmd.get_one::<String>("volume").expect(RCH)) {
        Ok(v) if v>=1 && v<=254 => v,
        _ => {
            error!("volume must be from 1 to 254");
            return Err(Box::new(CommandError::OutOfRange));
        }
    };
    let order = match cmd.get_one::<String>("order") {
        Some(s) if s!="auto" => SectorOrder::from_str(s)?,
        _ => img::order_from_extension(dest_path).unwrap_or(SectorOrder::Dos)
    };
    if std::path::Path::new(dest_path).exists() {
        error!("cannot overwrite existing {}",dest_path);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut op = DiskOperator::create_dos33(order,vol)?;
    super::save_img(&mut op,dest_path)
}
