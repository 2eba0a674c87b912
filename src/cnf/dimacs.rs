use std::{fs, io, path, str};
use std::collections::HashSet;
use std::io::Read;
use flate2::read::GzDecoder;
use crate::error::{Error, Result};
use super::{Cnf, LiteralSet, Variables};


/// Largest variable count a parsed formula may declare or use.
pub const MAX_VARS: usize = 1 << 22;


pub fn parse_file<P: AsRef<path::Path>>(path: P, strict: bool) -> Result<Cnf> {
    let mut raw = Vec::new();
    fs::File::open(path)?.read_to_end(&mut raw)?;

    // gzip magic
    if raw.starts_with(&[0x1f, 0x8b]) {
        let mut buf = String::new();
        GzDecoder::new(&raw[..]).read_to_string(&mut buf)?;
        parse_str(&buf, strict)
    } else {
        let buf = String::from_utf8(raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        parse_str(&buf, strict)
    }
}


pub fn parse<R: io::Read>(stream: &mut R, strict: bool) -> Result<Cnf> {
    let mut buf = String::new();
    stream.read_to_string(&mut buf)?;
    parse_str(&buf, strict)
}


/// Parses DIMACS text. Comment lines of the form `c <index> <name>` name
/// variables; other comments are ignored. With `strict` the header counts
/// must match the body.
pub fn parse_str(text: &str, strict: bool) -> Result<Cnf> {
    let mut p = DimacsParser {
        reader: text.chars(),
        cur: None,
        line: 1,
        vars: HashSet::new(),
        clauses: 0,
        names: Vec::new(),
    };
    p.next();
    p.parse_me(strict)
}


pub fn write_configuration<W: io::Write>(stream: &mut W, config: &LiteralSet) -> io::Result<()> {
    for lit in config.literals() {
        write!(stream, "{} ", lit)?;
    }
    writeln!(stream, "0")
}


/// Writes the variable table as name comments followed by one line per
/// configuration.
pub fn write_sample<W: io::Write>(stream: &mut W, variables: &Variables, configs: &[LiteralSet]) -> io::Result<()> {
    for idx in 1..=variables.len() as u32 {
        if let Some(name) = variables.name(idx) {
            writeln!(stream, "c {} {}", idx, name)?;
        }
    }
    writeln!(stream, "p sample {} {}", variables.len(), configs.len())?;
    for config in configs {
        write_configuration(stream, config)?;
    }
    Ok(())
}


struct DimacsParser<'p> {
    reader: str::Chars<'p>,
    cur: Option<char>,
    line: usize,
    vars: HashSet<i32>,
    clauses: usize,
    names: Vec<(u32, String)>,
}

impl<'p> DimacsParser<'p> {
    fn parse_me(&mut self, strict: bool) -> Result<Cnf> {
        enum State {
            Waiting,
            Parsing(usize, usize),
        }

        let mut cnf = Cnf::default();
        let mut state = State::Waiting;
        loop {
            self.skip_whitespace();
            match state {
                State::Waiting => match self.current() {
                    Some('c') => {
                        self.parse_comment();
                    }

                    None => {
                        return Err(self.error("missing 'p cnf' header"));
                    }

                    _ => {
                        self.consume("p cnf")?;
                        let vars = self.next_uint()?;
                        let clauses = self.next_uint()?;
                        if vars > MAX_VARS {
                            return Err(self.error(&format!("{} variables declared, at most {} supported", vars, MAX_VARS)));
                        }
                        *cnf.variables_mut() = Variables::anonymous(vars);
                        state = State::Parsing(vars, clauses);
                    }
                },

                State::Parsing(vars, clauses) => match self.current() {
                    Some('c') => {
                        self.parse_comment();
                    }

                    None => {
                        if strict {
                            if clauses != self.clauses {
                                return Err(self.error(&format!(
                                    "DIMACS header mismatch: {} clauses declared, {} found",
                                    clauses, self.clauses
                                )));
                            }

                            if vars < self.vars.len() {
                                return Err(self.error(&format!(
                                    "DIMACS header mismatch: {} vars declared, {} discovered",
                                    vars, self.vars.len()
                                )));
                            }
                        }
                        break;
                    }

                    _ => {
                        let c = self.parse_clause()?;
                        self.ensure_vars(&mut cnf, &c, strict)?;
                        cnf.add_clause(c)?;
                    }
                },
            }
        }

        for (idx, name) in self.names.drain(..) {
            if (idx as usize) <= cnf.n_vars() {
                cnf.variables_mut().rename(idx, &name)?;
            } else {
                debug!("ignoring name '{}' for undeclared variable {}", name, idx);
            }
        }

        Ok(cnf)
    }

    fn ensure_vars(&self, cnf: &mut Cnf, clause: &[i32], strict: bool) -> Result<()> {
        let max = clause.iter().map(|l| l.unsigned_abs() as usize).max().unwrap_or(0);
        if max > cnf.n_vars() {
            if strict {
                return Err(self.error(&format!("variable {} exceeds the declared count", max)));
            }
            if max > MAX_VARS {
                return Err(self.error(&format!("variable {} exceeds the supported {}", max, MAX_VARS)));
            }
            let mut vars = cnf.variables().clone();
            while vars.len() < max {
                let idx = vars.len() + 1;
                vars.register(&idx.to_string())?;
            }
            *cnf.variables_mut() = vars;
        }
        Ok(())
    }

    fn parse_clause(&mut self) -> Result<Vec<i32>> {
        let mut lits = Vec::new();
        loop {
            let lit = self.next_int()?;
            if lit == 0 {
                self.clauses += 1;
                return Ok(lits);
            } else {
                self.vars.insert(lit.abs());
                lits.push(lit);
            }
        }
    }

    // `c <index> <name>` names a variable; anything else is a plain comment.
    fn parse_comment(&mut self) {
        let mut text = String::new();
        self.next();
        while let Some(c) = self.cur {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.next();
        }

        let mut words = text.trim().splitn(2, char::is_whitespace);
        if let (Some(idx), Some(name)) = (words.next(), words.next()) {
            if let Ok(idx) = idx.parse::<u32>() {
                let name = name.trim();
                if idx > 0 && !name.is_empty() {
                    self.names.push((idx, name.to_string()));
                }
            }
        }
    }

    fn error(&self, msg: &str) -> Error {
        Error::Parse {
            line: self.line,
            msg: msg.to_string(),
        }
    }

    #[inline]
    fn next(&mut self) {
        if self.cur == Some('\n') {
            self.line += 1;
        }
        self.cur = self.reader.next();
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.cur
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.cur {
            if !c.is_whitespace() {
                break;
            }
            self.next();
        }
    }

    fn consume(&mut self, target: &str) -> Result<()> {
        for tc in target.chars() {
            match self.cur {
                Some(c) if c == tc => self.next(),
                _ => {
                    return Err(self.error(&format!("failed to consume; expected '{}'", target)));
                }
            }
        }
        Ok(())
    }

    fn read_int_body(&mut self) -> Result<usize> {
        let mut len: usize = 0;
        let mut value: usize = 0;
        loop {
            match self.cur.and_then(|c| c.to_digit(10)) {
                Some(d) => {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(d as usize))
                        .ok_or_else(|| self.error("integer overflow"))?;
                    len += 1;
                    self.next();
                }

                _ if len > 0 => return Ok(value),

                _ => return Err(self.error("int expected")),
            }
        }
    }

    fn next_int(&mut self) -> Result<i32> {
        self.skip_whitespace();
        let sign = match self.cur {
            Some('+') => {
                self.next();
                1
            }
            Some('-') => {
                self.next();
                -1
            }
            _ => 1,
        };

        let val = self.read_int_body()?;
        if val > i32::max_value() as usize {
            return Err(self.error("literal out of range"));
        }
        Ok(sign * (val as i32))
    }

    fn next_uint(&mut self) -> Result<usize> {
        self.skip_whitespace();
        if let Some('+') = self.cur {
            self.next();
        }
        self.read_int_body()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "c 1 Root\nc 2 Base\nc 3 Extra\np cnf 3 2\n1 0\n-1 2 0\n";

    #[test]
    fn names_come_from_comments() {
        let cnf = parse_str(MODEL, true).unwrap();
        assert_eq!(cnf.n_vars(), 3);
        assert_eq!(cnf.clauses().len(), 2);
        assert_eq!(cnf.variables().index_of("Extra").unwrap(), 3);
    }

    #[test]
    fn strict_mode_checks_header() {
        let text = "p cnf 2 3\n1 2 0\n";
        assert!(parse_str(text, false).is_ok());
        match parse_str(text, true) {
            Err(Error::Parse { .. }) => {}
            other => panic!("unexpected {:?}", other.map(|c| c.clauses().len())),
        }
    }

    #[test]
    fn lenient_mode_grows_variables() {
        let cnf = parse_str("p cnf 1 1\n1 -4 0\n", false).unwrap();
        assert_eq!(cnf.n_vars(), 4);
    }

    #[test]
    fn huge_variable_counts_are_rejected() {
        for &(text, strict) in &[
            ("p cnf 4000000000 0\n", true),
            ("p cnf 4000000000 0\n", false),
            ("p cnf 1 1\n1 -100000000 0\n", false),
        ] {
            match parse_str(text, strict) {
                Err(Error::Parse { .. }) => {}
                other => panic!("unexpected {:?}", other.map(|c| c.n_vars())),
            }
        }
    }

    #[test]
    fn sample_round_trips_through_writer() {
        let cnf = parse_str(MODEL, true).unwrap();
        let mut out = Vec::new();
        let config = LiteralSet::new(vec![1, 2, -3]);
        write_sample(&mut out, cnf.variables(), &[config]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("c 1 Root\n"));
        assert!(text.ends_with("p sample 3 1\n1 2 -3 0\n"));
    }
}
