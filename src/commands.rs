/// Interactive command surface
pub const MENU: &str = "
1. start      - connect to the emitter and begin processing messages
2. stop       - stop processing messages and disconnect from the emitter
3. info       - show the average value of each sensor over the last 10 messages
4. statistics - show the connection state and the number of received messages
5. exit       - shut the application down

Enter a command";

/// One command per input line, case-sensitive literal tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Info,
    Statistics,
    Exit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line {
            "start" => Command::Start,
            "stop" => Command::Stop,
            "info" => Command::Info,
            "statistics" => Command::Statistics,
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        }
    }
}
