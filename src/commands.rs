use blocksmith_edit::ToolMode;
use blocksmith_geom::{Face, LatticePos};
use blocksmith_world::{BlockId, Color, ColorParseError, Palette};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  mode build|delete|paint        select the tool
  color <name|#hex>              select the active color
  pick block <id> <face>         click a block face, e.g. `pick block #2 +y`
  pick at <x> <y> <z> <face>     click the face of the block at a cell
  pick ground <x> <z>            click the ground plane
  generate <description>         request a structure (replaces the world)
  challenge                      request a building challenge
  wait                           wait for outstanding requests
  clear                          remove every block
  list | stats | palette | help | quit";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not a number")]
    BadNumber(String),
    #[error("{0}")]
    BadMode(String),
    #[error("`{0}` is not a face (use +x, -x, +y, -y, +z, -z)")]
    BadFace(String),
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Id(BlockId),
    At(LatticePos),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mode(ToolMode),
    Color(Color),
    PickBlock { target: BlockRef, face: Face },
    PickGround { x: f32, z: f32 },
    Generate(String),
    Challenge,
    Wait,
    Clear,
    List,
    Stats,
    Palette,
    Help,
    Quit,
}

fn num<T: std::str::FromStr>(s: &str) -> Result<T, CommandError> {
    s.parse().map_err(|_| CommandError::BadNumber(s.to_string()))
}

fn face(s: &str) -> Result<Face, CommandError> {
    Face::from_label(s).ok_or_else(|| CommandError::BadFace(s.to_string()))
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str, palette: &Palette) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();
    let cmd = match head.to_ascii_lowercase().as_str() {
        "mode" => match args.as_slice() {
            [m] => Command::Mode(m.parse().map_err(CommandError::BadMode)?),
            _ => return Err(CommandError::Usage("mode build|delete|paint")),
        },
        "color" | "colour" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("color <name|#hex>"));
            }
            Command::Color(palette.resolve(rest)?)
        }
        "pick" => match args.as_slice() {
            ["block", id, f] => {
                let raw = id.strip_prefix('#').unwrap_or(*id);
                Command::PickBlock {
                    target: BlockRef::Id(BlockId::from_raw(num(raw)?)),
                    face: face(f)?,
                }
            }
            ["at", x, y, z, f] => Command::PickBlock {
                target: BlockRef::At(LatticePos::new(num(x)?, num(y)?, num(z)?)),
                face: face(f)?,
            },
            ["ground", x, z] => Command::PickGround {
                x: num(x)?,
                z: num(z)?,
            },
            _ => {
                return Err(CommandError::Usage(
                    "pick block <id> <face> | pick at <x> <y> <z> <face> | pick ground <x> <z>",
                ));
            }
        },
        "generate" | "gen" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("generate <description>"));
            }
            Command::Generate(rest.to_string())
        }
        "challenge" => Command::Challenge,
        "wait" => Command::Wait,
        "clear" => Command::Clear,
        "list" | "ls" => Command::List,
        "stats" => Command::Stats,
        "palette" => Command::Palette,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}
