// External collaborators: the hand landmark model and the video source it reads

pub mod hand;
