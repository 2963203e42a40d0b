use clap::{value_parser, crate_version, Arg, ArgAction, Command, ValueHint};

const NAME_HELP: &str = "DOS file names are converted to upper case,
arbitrary bytes can be introduced using hex escapes such as `\\x07`";

fn file_arg(help: &'static str, req: bool) -> Arg {
    Arg::new("file").short('f').long("file").value_name("NAME").required(req).help(help)
        .long_help([help,"\n",NAME_HELP].concat())
}

fn indent_arg() -> Arg {
    Arg::new("indent").long("indent").help("JSON indentation, omit to minify")
        .value_name("SPACES")
        .value_parser(value_parser!(u16).range(0..16))
        .required(false)
}

fn dimg_arg() -> Arg {
    Arg::new("dimg").short('d').long("dimg").help("path to disk image itself")
        .value_name("PATH")
        .value_hint(ValueHint::FilePath)
        .required(true)
}

pub fn build_cli() -> Command {
    let long_help = "a2dos is always invoked with exactly one of several subcommands.
The subcommands work on DOS 3.3 volumes in DO, PO, or DSK image files.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
create DOS image:      `a2dos mkdsk -v 254 -t do -d myimg.dsk`
put binary file:       `a2dos put -f prog -t bin -a 768 -d myimg.dsk < prog.bin`
put host file:         `a2dos put -i notes.txt -d myimg.dsk`
get text file:         `a2dos get -f notes -d myimg.dsk`
list files:            `a2dos catalog -d myimg.dsk`";

    let img_types = ["do", "po"];
    let get_put_types = ["bin", "txt", "raw"];

    let mut main_cmd = Command::new("a2dos")
        .about("Manipulates DOS 3.3 volumes in disk images.")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("mkdsk")
            .arg(Arg::new("volume").long("volume").short('v').value_name("VOLUME").help("volume number, 1 to 254")
                .required(false))
            .arg(Arg::new("type").long("type").short('t').value_name("TYPE").help("type of disk image to create")
                .required(true)
                .value_parser(img_types))
            .arg(Arg::new("tracks").long("tracks").value_name("TRACKS").help("tracks on the volume")
                .value_parser(value_parser!(u8).range(18..=50))
                .required(false))
            .arg(Arg::new("sectors").long("sectors").value_name("SECTORS").help("sectors per track")
                .value_parser(value_parser!(u8).range(16..=32))
                .required(false)
                .long_help("sectors per track, must be 16 or 32, PO images require 16"))
            .arg(Arg::new("dimg").long("dimg").short('d').value_name("PATH").help("disk image path to create")
                .value_hint(ValueHint::FilePath)
                .required(true))
            .visible_alias("mkimg")
            .about("write a new DOS 3.3 disk image to the given path")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("get")
            .arg(file_arg("name of the file inside the disk image",true))
            .arg(Arg::new("type").long("type").short('t').help("how to decode the file")
                .value_name("TYPE").required(false).value_parser(get_put_types)
                .long_help("how to decode the file, default is chosen by the DOS file type"))
            .arg(dimg_arg())
            .arg(Arg::new("trunc").long("trunc").help("truncate raw at first null").action(ArgAction::SetTrue))
            .arg(Arg::new("console").long("console").help("format for console unconditionally")
                .action(ArgAction::SetTrue)
                .long_help("even if the output context is a file or pipe, format it for the console"))
            .about("read from disk image, write to stdout")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("put")
            .arg(file_arg("name of the file inside the disk image",false))
            .arg(Arg::new("type").long("type").short('t').help("how to encode the file")
                .value_name("TYPE").required(false).value_parser(get_put_types))
            .arg(dimg_arg())
            .arg(Arg::new("addr").long("addr").short('a').help("load-address of binary file").value_name("ADDRESS").required(false))
            .arg(Arg::new("ftype").long("ftype").help("DOS file type for raw data, code or mnemonic").value_name("FTYPE").required(false))
            .arg(Arg::new("input").long("input").short('i').help("host file to read instead of stdin")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .required(false))
            .about("read from stdin or host file, write to disk image")
            .after_help("if the name is omitted it is derived from the host file name")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("catalog")
            .arg(dimg_arg())
            .visible_alias("ls")
            .visible_alias("cat")
            .about("write disk image catalog to stdout")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("stat")
            .arg(dimg_arg())
            .arg(indent_arg())
            .about("write volume statistics to stdout as JSON")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("delete")
            .arg(file_arg("name of the file to delete",true))
            .arg(dimg_arg())
            .visible_alias("del")
            .about("delete a file inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("lock")
            .arg(file_arg("name of the file to lock",true))
            .arg(dimg_arg())
            .about("write protect a file inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("unlock")
            .arg(file_arg("name of the file to unlock",true))
            .arg(dimg_arg())
            .about("remove write protection from a file inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("rename")
            .arg(file_arg("name of the file to rename",true))
            .arg(Arg::new("name").long("name").short('n').value_name("NAME").help("new name").required(true))
            .arg(dimg_arg())
            .about("rename a file inside a disk image")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(Arg::new("shell").long("shell").short('s').value_name("SHELL").help("shell type")
                .value_parser(["bash", "elv", "fish", "ps1", "zsh"])
                .required(true))
            .about("write completions script to stdout")
    );
    main_cmd
}
