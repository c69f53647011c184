//! # Command Line Interface
//!
//! Simple subcommands are directly in `main.rs`.
//! More elaborate subcommands are in the `commands` module.

use clap::{arg,crate_version,Command,ArgAction};
use env_logger;
use a2fs::commands;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"a2fs is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
create DOS image:      `a2fs mkdsk -v 254 -d myimg.dsk`
list files:            `a2fs catalog -d myimg.dsk`
save a binary file:    `cat prog.bin | a2fs put -f PROG -t B -a 768 -d myimg.dsk`
Integer BASIC listing: `a2fs get -f HELLO --listing -d myimg.dsk`
Tokenize to image:     `a2fs tokenize < prog.txt | a2fs put -f PROG -t I -d myimg.dsk`";

    let order_names = ["auto","do","po"];
    let system_names = ["auto","dos3","prodos"];
    let order_arg = || arg!(--order <ORDER> "sector order of the image").required(false)
        .value_parser(order_names)
        .default_value("auto");
    let system_arg = || arg!(--system <SYSTEM> "file system of the image").required(false)
        .value_parser(system_names)
        .default_value("auto");

    let mut main_cmd = Command::new("a2fs")
        .about("Reads and writes files on Apple II DOS 3.3 and ProDOS disk images.")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("mkdsk")
        .arg(arg!(-v --volume <VOLUME> "volume number").required(false).default_value("254"))
        .arg(arg!(-d --dimg <PATH> "disk image path to create").required(true))
        .arg(arg!(--order <ORDER> "sector order of the image").required(false).value_parser(["do","po"]))
        .about("write a blank DOS 3.3 disk image to the given path"));
    main_cmd = main_cmd.subcommand(Command::new("catalog")
        .arg(arg!(-d --dimg <PATH> "path to disk image").required(true))
        .arg(order_arg())
        .arg(system_arg())
        .about("write disk image catalog to stdout"));
    main_cmd = main_cmd.subcommand(Command::new("get")
        .arg(arg!(-f --file <NAME> "name of file inside disk image").required(true))
        .arg(arg!(-d --dimg <PATH> "path to disk image").required(true))
        .arg(arg!(--listing "detokenize an Integer BASIC file").action(ArgAction::SetTrue))
        .arg(order_arg())
        .arg(system_arg())
        .about("read from disk image, write to stdout"));
    main_cmd = main_cmd.subcommand(Command::new("put")
        .arg(arg!(-f --file <NAME> "name of file inside disk image").required(true))
        .arg(arg!(-t --type <TYPE> "type of file (`a2fs filetypes` to list)").required(false).default_value("B"))
        .arg(arg!(-a --addr <ADDRESS> "load address of binary file").required(false))
        .arg(arg!(-d --dimg <PATH> "path to disk image").required(true))
        .arg(arg!(--overwrite "overwrite an existing file").action(ArgAction::SetTrue))
        .arg(order_arg())
        .arg(system_arg())
        .about("read from stdin, write to disk image"));
    main_cmd = main_cmd.subcommand(Command::new("delete")
        .arg(arg!(-f --file <NAME> "name of file inside disk image").required(true))
        .arg(arg!(-d --dimg <PATH> "path to disk image").required(true))
        .arg(order_arg())
        .arg(system_arg())
        .about("delete a file inside a disk image"));
    main_cmd = main_cmd.subcommand(Command::new("lock")
        .arg(arg!(-f --file <NAME> "name of file inside disk image").required(true))
        .arg(arg!(-d --dimg <PATH> "path to disk image").required(true))
        .arg(order_arg())
        .arg(system_arg())
        .about("write protect a file inside a disk image"));
    main_cmd = main_cmd.subcommand(Command::new("unlock")
        .arg(arg!(-f --file <NAME> "name of file inside disk image").required(true))
        .arg(arg!(-d --dimg <PATH> "path to disk image").required(true))
        .arg(order_arg())
        .arg(system_arg())
        .about("remove write protection from a file inside a disk image"));
    main_cmd = main_cmd.subcommand(Command::new("rename")
        .arg(arg!(-f --file <NAME> "name of file inside disk image").required(true))
        .arg(arg!(-n --name <NAME> "new name").required(true))
        .arg(arg!(-d --dimg <PATH> "path to disk image").required(true))
        .arg(order_arg())
        .arg(system_arg())
        .about("rename a file inside a disk image"));
    main_cmd = main_cmd.subcommand(Command::new("tokenize")
        .about("read Integer BASIC from stdin, tokenize, write to stdout"));
    main_cmd = main_cmd.subcommand(Command::new("detokenize")
        .about("read tokenized Integer BASIC from stdin, detokenize, write to stdout"));
    main_cmd = main_cmd.subcommand(Command::new("filetypes")
        .about("list the file types and their abbreviations"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("mkdsk") {
        return commands::mkdsk::mkdsk(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("catalog") {
        return commands::modify::catalog(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("get") {
        return commands::get::get(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("put") {
        return commands::put::put(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("delete") {
        return commands::modify::delete(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("lock") {
        return commands::modify::lock(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("unlock") {
        return commands::modify::unlock(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("rename") {
        return commands::modify::rename(cmd);
    }
    if let Some(_cmd) = matches.subcommand_matches("tokenize") {
        return commands::langx::tokenize();
    }
    if let Some(_cmd) = matches.subcommand_matches("detokenize") {
        return commands::langx::detokenize();
    }
    if let Some(_cmd) = matches.subcommand_matches("filetypes") {
        return commands::langx::filetypes();
    }

    eprintln!("No subcommand was found, try `a2fs --help`");
    return Err(Box::new(commands::CommandError::InvalidCommand));
}
