use crate::console::{Console, Flow};

fn parse<T: std::str::FromStr>(word: Option<&str>, what: &str, line: &str) -> Result<T, String> {
    let Some(word) = word else {
        return Err(format!("Missing {what} in: {line}"));
    };
    word.parse()
        .map_err(|_| format!("Invalid {what} '{word}' in: {line}"))
}

pub fn read_console_line(line: &str, dispatch: &mut dyn Console) -> Result<Flow, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Flow::Continue);
    };
    let done = match command {
        "new" => dispatch.provision(parse(words.next(), "size", line)?),
        "options" => dispatch.options(),
        "setoption" => {
            let Some(name_literal) = words.next() else {
                return Err(format!("Invalid setoption line: {line}"));
            };
            if name_literal != "name" {
                return Err(format!("Missing 'name' parameter in: {line}"));
            }
            let Some(option_name) = words.next() else {
                return Err(format!("Missing 'name' value in: {line}"));
            };
            let Some(value_literal) = words.next() else {
                return dispatch.set_option(option_name, None).map(|_| Flow::Continue);
            };
            if value_literal != "value" {
                return Err(format!("Invalid 'value' parameter in: {line}"));
            }
            let Some(value) = words.next() else {
                return Err(format!("Missing 'value' value in: {line}"));
            };
            dispatch.set_option(option_name, Some(value))
        }
        "put" => {
            let key = parse(words.next(), "key", line)?;
            let value = parse(words.next(), "value", line)?;
            dispatch.put(key, value)
        }
        "get" => dispatch.get(parse(words.next(), "key", line)?),
        "find" => dispatch.find(parse(words.next(), "key", line)?),
        "stats" => dispatch.stats(),
        "quit" => return Ok(Flow::Quit),
        _ => Err(format!("Invalid command: {line}")),
    };
    done.map(|_| Flow::Continue)
}
