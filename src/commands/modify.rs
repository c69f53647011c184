use clap;
use log::error;
use super::CommandError;
use crate::STDRESULT;
const RCH: &str = "unreachable was reached";

pub fn delete(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut op = super::open_img(cmd)?;
    if !op.delete(name)? {
        error!("{} was not found",name);
        return Err(Box::new(CommandError::FileNotFound));
    }
    return super::save_img(&mut op,path_to_img);
}

pub fn lock(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut op = super::open_img(cmd)?;
    op.lock(name)?;
    return super::save_img(&mut op,path_to_img);
}

pub fn unlock(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("file").expect(RCH);
    let mut op = super::open_img(cmd)?;
    op.unlock(name)?;
    return super::save_img(&mut op,path_to_img);
}

pub fn rename(cmd: &clap::ArgMatches) -> STDRESULT {
    let path_to_img = cmd.get_one::<String>("dimg").expect(RCH);
    let name = cmd.get_one::<String>("name").expect(RCH);
    let old_name = cmd.get_one::<String>("file").expect(RCH);
    let mut op = super::open_img(cmd)?;
    op.rename(old_name,name)?;
    return super::save_img(&mut op,path_to_img);
}

pub fn catalog(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut op = super::open_img(cmd)?;
    print!("{}",op.catalog_to_string()?);
    Ok(())
}
