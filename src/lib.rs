//! Ambient Traffic Simulation Library
//!
//! Procedural cars, boats, birds, pedestrians and pigeon flocks animated over a
//! road/waterway network. The library never renders; a host reads the agent
//! pools once per frame after calling `SimWorld::tick`.

pub mod simulation;
