use crate::{
    console::{self, Console},
    map::LongLongMap,
    memory::HeapMemory,
    options::MapOptions,
};

// Where the console pretends its blocks start.
const BLOCK_BASE: u64 = 0x1000;

pub struct Session {
    map: Option<LongLongMap<HeapMemory>>,
    options: MapOptions,
}

impl Session {
    pub fn new() -> Session {
        Session {
            map: None,
            options: MapOptions::default(),
        }
    }

    pub fn map(&self) -> Option<&LongLongMap<HeapMemory>> {
        self.map.as_ref()
    }

    fn map_mut(&mut self) -> Result<&mut LongLongMap<HeapMemory>, String> {
        self.map
            .as_mut()
            .ok_or(String::from("No block yet, provision one with: new <size>"))
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl Console for Session {
    fn provision(&mut self, size: u64) -> Result<(), String> {
        self.map = None;
        let memory = HeapMemory::new(BLOCK_BASE, 0);
        let map = LongLongMap::with_options(memory, BLOCK_BASE, size, &self.options)
            .map_err(|e| e.to_string())?;
        console::ready(&map.stats());
        self.map = Some(map);
        Ok(())
    }

    fn options(&mut self) -> Result<(), String> {
        MapOptions::report();
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String> {
        self.options.set_option(name, value).map(|_| ())
    }

    fn put(&mut self, key: i64, value: i64) -> Result<(), String> {
        let previous = self.map_mut()?.put(key, value).map_err(|e| e.to_string())?;
        console::previous(key, previous);
        Ok(())
    }

    fn get(&mut self, key: i64) -> Result<(), String> {
        let value = self.map_mut()?.get(key);
        console::value(key, Some(value));
        Ok(())
    }

    fn find(&mut self, key: i64) -> Result<(), String> {
        let value = self.map_mut()?.find(key);
        console::value(key, value);
        Ok(())
    }

    fn stats(&mut self) -> Result<(), String> {
        console::stats(&self.map_mut()?.stats());
        Ok(())
    }
}
